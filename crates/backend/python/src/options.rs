//! Compile options.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading [`Options`].
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("failed to read options: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid options: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Compile-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Annotate each assignment with a `# file:line` comment.
    pub line_numbers: bool,
    /// Source file name used in line annotations.
    pub filename: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            line_numbers: true,
            filename: "<stdin>".to_string(),
        }
    }
}

impl Options {
    /// Load options from a TOML file. Missing keys keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, OptionsError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, OptionsError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn with_line_numbers(mut self, line_numbers: bool) -> Self {
        self.line_numbers = line_numbers;
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }
}
