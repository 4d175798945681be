//! Unified error types for the ucdport workspace.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum UcdportError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The source document is not valid JSON or does not have the expected shape.
    #[error("malformed input document {path}: {source}")]
    InputParse {
        /// Path of the offending document.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// A template registry file could not be parsed.
    #[error("malformed template registry {path}: {source}")]
    Registry {
        /// Path of the registry file.
        path: PathBuf,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },

    /// A generated document could not be serialized.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying YAML error.
        #[from]
        source: serde_yaml::Error,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, UcdportError>;
