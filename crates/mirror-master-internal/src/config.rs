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

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cost::Penalty;
use crate::engine::{Bounds, EngineConfig};
use crate::error::Error;
use crate::geometry::Complex;
use crate::mechanism::Dimensions;

#[cfg(test)]
mod tests {
    use crate::cost::Penalty;
    use crate::engine::EngineConfig;

    use super::Config;

    #[test]
    fn empty_document_gives_defaults() {
        let config = Config::from_json("{}").unwrap();

        assert_eq!(config.penalty, Penalty::FocusAligned);
        assert!(config.require_convergence);
        assert!(!config.warm_start);
        assert!((config.initial_guess.imaginary - 3.0).abs() < 1e-12);
        assert!(matches!(config.engine, EngineConfig::Simplex(_)));
    }

    #[test]
    fn partial_document() {
        let config = Config::from_json(
            r#"{
                "dimensions": { "base_width": 6, "piston_max": 8, "piston_min": 3 },
                "penalty": "classic",
                "engine": { "kind": "rage", "samples": 8, "seed": 3 },
                "warm_start": true
            }"#,
        )
        .unwrap();

        assert!((config.dimensions.base_width - 6.0).abs() < 1e-12);
        assert!((config.dimensions.min_piston() - 3.0).abs() < 1e-12);
        assert!((config.dimensions.mirror_width - 2.0).abs() < 1e-12);
        assert_eq!(config.penalty, Penalty::Classic);
        assert!(config.warm_start);

        let EngineConfig::Rage(params) = config.engine else {
            panic!("expected the random engine");
        };
        assert_eq!(params.samples, 8);
        assert_eq!(params.seed, Some(3));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(Config::from_json(r#"{ "dimensions": { "mirror_width": 0 } }"#).is_err());
        assert!(Config::from_json(r#"{ "bounds": { "x": [1, -1], "y": [0, 15] } }"#).is_err());
        assert!(Config::from_json(r#"{ "penalty": "sideways" }"#).is_err());
    }
}

/// Everything needed to run a tracking session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dimensions: Dimensions,
    pub penalty: Penalty,
    pub engine: EngineConfig,
    pub bounds: Bounds,
    /// Where every search starts (unless warm starting).
    pub initial_guess: Complex,
    /// Start every search from the previous solution.
    pub warm_start: bool,
    /// Discard solutions the engine did not converge to.
    pub require_convergence: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dimensions: Dimensions::default(),
            penalty: Penalty::default(),
            engine: EngineConfig::default(),
            bounds: Bounds::default(),
            initial_guess: Complex::new(0.0, 3.0),
            warm_start: false,
            require_convergence: true,
        }
    }
}

impl Config {
    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    /// If the document is malformed or describes an impossible mechanism.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;

        Ok(config)
    }

    /// Load a JSON configuration file.
    ///
    /// # Errors
    /// If the file can't be read or [`Config::from_json`] fails.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// # Errors
    /// If the configuration describes an impossible mechanism or search.
    pub fn validate(&self) -> Result<(), Error> {
        self.dimensions.validate()?;
        self.bounds.validate()?;

        if !self.initial_guess.is_finite() {
            return Err(Error::NonFiniteTarget(self.initial_guess));
        }

        // Engine parameters are validated by constructing the engine.
        self.engine.build().map(drop)
    }
}
