//! Error types for running a recommender job.
//!
//! Everything here is fatal to the job except persistence failures in
//! lenient mode, which the result writer records instead of returning.

use conf::ConfError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The pluggable capabilities a job resolves from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    DataModel,
    Similarity,
    Recommender,
    Evaluator,
    Filter,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::DataModel => "data model",
            Capability::Similarity => "similarity",
            Capability::Recommender => "recommender",
            Capability::Evaluator => "evaluator",
            Capability::Filter => "filter",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum JobError {
    /// No component registered under the configured identifier
    #[error("No {capability} registered as '{identifier}'")]
    ComponentNotFound {
        capability: Capability,
        identifier: String,
    },

    /// The component's constructor failed
    #[error("Failed to construct {capability} '{identifier}': {reason:#}")]
    ComponentConstruction {
        capability: Capability,
        identifier: String,
        reason: anyhow::Error,
    },

    /// Building the data model or a similarity matrix failed
    #[error("Failed to build {stage}: {reason:#}")]
    Build {
        stage: &'static str,
        reason: anyhow::Error,
    },

    /// A recommender, evaluator or filter reported a failure
    #[error("{stage} failed: {reason:#}")]
    Domain {
        stage: &'static str,
        reason: anyhow::Error,
    },

    /// Saving results failed (strict output mode only)
    #[error("Failed to write results to {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown split mode: {0}")]
    UnknownSplitMode(String),

    #[error(transparent)]
    Conf(#[from] ConfError),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, JobError>;
