/*
Copyright (c) 2026 The Mirror Master developers

Permission is hereby granted, free of charge, to any person obtaining a copy of this software and
associated documentation files (the “Software”), to deal in the Software without restriction,
including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense,
and/or sell copies of the Software, and to permit persons to whom the Software is furnished to do
so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all copies or substantial
portions of the Software.

THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS
OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY,
WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
*/

use std::fmt::{Display, Formatter};
use std::io;

use crate::geometry::Complex;

/// Everything that can go wrong while configuring or running the mechanism.
#[derive(Debug)]
pub enum Error {
    /// A mechanism dimension was zero, negative or not a number.
    InvalidDimension { name: &'static str, value: f64 },
    /// The piston stroke range is empty.
    InvalidPistonRange { min: f64, max: f64 },
    /// The optimization bounds are empty or not finite.
    InvalidBounds,
    /// An engine parameter makes no sense.
    InvalidEngineParameter { name: &'static str, value: f64 },
    /// The requested target can't be tracked.
    NonFiniteTarget(Complex),
    /// The penalty evaluated to NaN or infinity.
    NonFiniteCost { at: Complex },
    /// Reading or writing a file failed.
    Io(io::Error),
    /// A configuration file could not be parsed.
    Config(serde_json::Error),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDimension { name, value } => {
                write!(f, "invalid {name}: {value} (all values must be positive)")
            }
            Self::InvalidPistonRange { min, max } => write!(
                f,
                "minimum piston length {min} must be smaller than the maximum {max}"
            ),
            Self::InvalidBounds => write!(f, "optimization bounds must be finite and non-empty"),
            Self::InvalidEngineParameter { name, value } => {
                write!(f, "invalid engine parameter {name}: {value}")
            }
            Self::NonFiniteTarget(target) => write!(f, "target {target} is not a finite point"),
            Self::NonFiniteCost { at } => {
                write!(f, "penalty is not finite for mirror center {at}")
            }
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Config(err) => write!(f, "invalid configuration: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::Config(value)
    }
}
