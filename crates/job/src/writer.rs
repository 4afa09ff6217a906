//! Saves recommendation lists as `user,item,score` lines.

use crate::error::{JobError, Result};
use crate::report::PersistOutcome;
use components::RecommendedItem;
use conf::{keys, Configuration};
use data_model::SplitMode;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Writes each fold's list under `dfs.result.dir`.
///
/// In lenient mode (the default) a failed write is logged and reported as
/// [`PersistOutcome::Failed`]; with `rec.output.strict` it fails the job.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultWriter {
    strict: bool,
}

impl ResultWriter {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    pub fn from_conf(conf: &Configuration) -> Result<Self> {
        Ok(Self::new(conf.get_bool(keys::OUTPUT_STRICT)?))
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// `{dfs.result.dir}/{data.input.path}-{algo}-output/{algo}`, with a
    /// `-{fold}` suffix under cross validation when a fold index is set.
    pub fn output_path(
        conf: &Configuration,
        algo_name: &str,
        split_mode: Option<SplitMode>,
    ) -> Result<PathBuf> {
        let result_dir = conf.require(keys::RESULT_DIR)?.trim_end_matches('/');
        let input_path = conf.require(keys::INPUT_PATH)?;

        let mut path = format!(
            "{}/{}-{}-output/{}",
            result_dir, input_path, algo_name, algo_name
        );
        if split_mode.is_some_and(|mode| mode.is_cross_validation()) {
            if let Some(fold) = conf.fold_index()? {
                let _ = write!(path, "-{}", fold);
            }
        }
        Ok(PathBuf::from(path))
    }

    /// One `user,item,score` line per item, each newline terminated
    pub fn serialize(items: &[RecommendedItem]) -> String {
        let mut out = String::with_capacity(items.len() * 24);
        for item in items {
            let _ = writeln!(out, "{},{},{:?}", item.user_id, item.item_id, item.score);
        }
        out
    }

    /// Saves `items`; an empty list writes nothing.
    pub fn save(
        &self,
        conf: &Configuration,
        algo_name: &str,
        split_mode: Option<SplitMode>,
        items: &[RecommendedItem],
    ) -> Result<PersistOutcome> {
        if items.is_empty() {
            return Ok(PersistOutcome::Skipped);
        }

        let path = Self::output_path(conf, algo_name, split_mode)?;
        info!("Result path is {}", path.display());

        match write_file(&path, &Self::serialize(items)) {
            Ok(()) => Ok(PersistOutcome::Written(path)),
            Err(source) if self.strict => Err(JobError::Io { path, source }),
            Err(e) => {
                error!("Failed to write results to {}: {}", path.display(), e);
                Ok(PersistOutcome::Failed {
                    path,
                    reason: e.to_string(),
                })
            }
        }
    }
}

fn write_file(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}
