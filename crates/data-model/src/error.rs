//! Error types for the data-model crate.

use conf::ConfError;
use thiserror::Error;

/// Errors that can occur while loading, parsing or splitting rating data
#[derive(Error, Debug)]
pub enum DataModelError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Line in a rating file couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// Fewer fields on a line than the format needs
    #[error("Expected at least {expected} fields but found {found} in line {line}")]
    FieldCountMismatch {
        expected: usize,
        found: usize,
        line: usize,
    },

    /// `data.model.splitter` names no known split mode
    #[error("Unknown split mode: {0}")]
    UnknownSplitMode(String),

    /// Split parameters are inconsistent with the data or each other
    #[error("Invalid split: {0}")]
    InvalidSplit(String),

    #[error(transparent)]
    Conf(#[from] ConfError),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataModelError>;
