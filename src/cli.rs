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

use std::{fmt::Display, path::Path};

use crossterm::style::{Color, Stylize};
use mirror_master_internal::Error;


#[derive(Debug, Clone, Copy)]
pub enum DiagnosticKind {
    Error,
    Warning,
}

#[must_use]
pub fn get_color(kind: DiagnosticKind) -> Color {
    match kind {
        DiagnosticKind::Error => Color::Red,
        DiagnosticKind::Warning => Color::Yellow,
    }
}

#[derive(Debug, Clone, Copy)]
pub enum AnnotationKind {
    Note,
    Help,
}

/// A message for the user of the command line tool.
#[derive(Debug)]
pub struct Diagnostic {
    kind: DiagnosticKind,
    message: String,
    notes: Vec<(AnnotationKind, String)>,
}

impl Diagnostic {
    #[must_use]
    pub fn new<S: ToString + ?Sized>(kind: DiagnosticKind, message: &S) -> Self {
        Self {
            kind,
            message: message.to_string(),
            notes: Vec::new(),
        }
    }

    #[must_use]
    pub fn add_note(mut self, kind: AnnotationKind, message: String) -> Self {
        self.notes.push((kind, message));
        self
    }

    /// Describe a library error, pointing at the configuration file if one was used.
    #[must_use]
    pub fn from_error(error: &Error, config: Option<&Path>) -> Self {
        let mut diagnostic = Self::new(DiagnosticKind::Error, error);

        if let Some(path) = config {
            diagnostic = diagnostic.add_note(
                AnnotationKind::Note,
                format!("configuration loaded from {}", path.display()),
            );
        }

        let help = match error {
            Error::InvalidDimension { .. } => Some("all mechanism dimensions must be positive"),
            Error::InvalidPistonRange { .. } => {
                Some("the shortest piston length must be positive and below the longest one")
            }
            Error::InvalidBounds => Some("bounds are pairs of finite numbers, lower first"),
            Error::NonFiniteTarget(_) => Some("targets are given as `X,Y`, e.g. `--target 0,6`"),
            Error::InvalidEngineParameter { .. }
            | Error::NonFiniteCost { .. }
            | Error::Io(_)
            | Error::Config(_) => None,
        };

        match help {
            Some(help) => diagnostic.add_note(AnnotationKind::Help, String::from(help)),
            None => diagnostic,
        }
    }

    /// Warn about frames that ended without a mirror position.
    #[must_use]
    pub fn unsolved(solved: usize, frames: usize) -> Option<Self> {
        (solved < frames).then(|| {
            Self::new(
                DiagnosticKind::Warning,
                &format!("{} of {frames} frames have no solution", frames - solved),
            )
            .add_note(
                AnnotationKind::Help,
                String::from("`--allow-unconverged` keeps the best position the engine found"),
            )
        })
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{}{} {}",
            match self.kind {
                DiagnosticKind::Error => "error".with(get_color(self.kind)).bold(),
                DiagnosticKind::Warning => "warning".with(get_color(self.kind)).bold(),
            },
            ":".white().bold(),
            self.message.clone().white().bold()
        )?;

        for note in &self.notes {
            writeln!(
                f,
                "  {} {}",
                "=".blue().bold(),
                format!(
                    "{}: {}",
                    match &note.0 {
                        AnnotationKind::Note => "note",
                        AnnotationKind::Help => "help",
                    },
                    note.1
                )
            )?;
        }

        Ok(())
    }
}
