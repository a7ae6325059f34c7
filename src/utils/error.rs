//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Structural failure while reading a profile report
///
/// Display is the bare message so callers can match on it; the report path
/// and the 1-based line number where parsing stopped travel alongside.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ProfileError {
    pub message: String,
    pub path: PathBuf,
    pub lineno: usize,
}

impl ProfileError {
    pub fn new(message: impl Into<String>, path: impl AsRef<Path>, lineno: usize) -> Self {
        Self {
            message: message.into(),
            path: path.as_ref().to_path_buf(),
            lineno,
        }
    }

    /// `path:lineno: message`, for log lines
    pub fn location(&self) -> String {
        format!("{}:{}: {}", self.path.display(), self.lineno, self.message)
    }
}

/// Errors that can occur while loading settings
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings: {0}")]
    ReadFailed(#[from] std::io::Error),

    #[error("Invalid settings file: {0}")]
    Invalid(#[from] toml::de::Error),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),

    #[error("Not a coverage data file: {0}")]
    InvalidData(String),
}
