//! Error types for the conf crate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or reading a [`Configuration`](crate::Configuration).
#[derive(Error, Debug)]
pub enum ConfError {
    /// Config file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML config file is not valid TOML
    #[error("Invalid TOML in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A properties line or override has no `=`
    #[error("Malformed config line {line}: {content}")]
    MalformedLine { line: usize, content: String },

    /// A required key is absent
    #[error("Missing required configuration key: {0}")]
    MissingKey(String),

    /// A key is present but its value cannot be interpreted
    #[error("Invalid value for {key}: {value} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ConfError>;
