//! Per-run summaries returned to callers.

use crate::evaluation::EvaluationReport;
use data_model::SplitMode;
use serde::Serialize;
use std::path::PathBuf;

/// Outcome of saving one fold's recommendations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PersistOutcome {
    /// The list was empty; nothing was written
    Skipped,
    Written(PathBuf),
    /// The write failed and the job carried on
    Failed { path: PathBuf, reason: String },
}

impl PersistOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, PersistOutcome::Failed { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FoldReport {
    /// `None` outside cross validation
    pub fold_index: Option<u32>,
    pub recommender: String,
    pub recommendations: usize,
    pub evaluation: Option<EvaluationReport>,
    pub persist: PersistOutcome,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub job_id: String,
    pub split_mode: SplitMode,
    pub folds: Vec<FoldReport>,
}

impl JobReport {
    /// Folds whose results could not be written
    pub fn failed_writes(&self) -> impl Iterator<Item = &FoldReport> {
        self.folds.iter().filter(|fold| fold.persist.is_failed())
    }
}
