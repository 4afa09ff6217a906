//! # Job Crate
//!
//! Drives a recommender experiment end to end.
//!
//! ## Main Components
//!
//! - **job**: `RecommenderJob`, the fold loop and per-fold pipeline
//! - **registry**: identifiers to component constructors
//! - **provider**: the single data model shared by all folds
//! - **similarity**, **evaluation**, **filter**: the optional stages
//! - **writer**: result files
//! - **report**: what a run returns

pub mod error;
pub mod evaluation;
pub mod filter;
pub mod job;
pub mod provider;
pub mod registry;
pub mod report;
pub mod similarity;
pub mod writer;

pub use error::{Capability, JobError, Result};
pub use evaluation::EvaluationReport;
pub use job::RecommenderJob;
pub use registry::ComponentRegistry;
pub use report::{FoldReport, JobReport, PersistOutcome};
pub use writer::ResultWriter;
