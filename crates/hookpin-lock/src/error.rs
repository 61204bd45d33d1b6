//! Error types for hookpin-lock

use std::path::PathBuf;
use thiserror::Error;

use crate::types::Ecosystem;

/// Result type alias using hookpin-lock Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading lock files
#[derive(Debug, Error)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    Toml(String),

    /// File name does not match any supported lock format
    #[error("unsupported lock file: {0}")]
    UnsupportedLockFile(PathBuf),

    /// Recognized lock format with an unsupported revision or shape
    #[error("invalid format for {path}: {message}")]
    UnsupportedFormat {
        /// Lock file concerned
        path: PathBuf,
        /// What was unsupported
        message: String,
    },

    /// Two lock files cover the same ecosystem
    #[error("multiple {0} lock files are not supported yet")]
    DuplicateEcosystem(Ecosystem),
}
