//! # Recommender Job
//!
//! Runs one experiment described by a [`Configuration`]:
//! 1. Resolve the split mode and the folds it implies
//! 2. Per fold: build the data model, build similarities, train and
//!    recommend, evaluate, filter, save
//!
//! Every fold sees its own configuration snapshot with the fold index
//! injected, so nothing a fold sets leaks into the next.

use crate::error::{JobError, Result};
use crate::evaluation;
use crate::filter;
use crate::provider::DataModelProvider;
use crate::registry::ComponentRegistry;
use crate::report::{FoldReport, JobReport};
use crate::similarity;
use crate::writer::ResultWriter;
use components::RecommenderContext;
use conf::{keys, Configuration, ConfError};
use data_model::{RandomSource, SplitMode};
use std::time::Instant;
use tracing::{info, instrument};
use uuid::Uuid;

pub struct RecommenderJob {
    conf: Configuration,
    registry: ComponentRegistry,
    provider: DataModelProvider,
    writer: ResultWriter,
}

impl RecommenderJob {
    /// Prepares a job; nothing is loaded until [`run_job`](Self::run_job).
    ///
    /// Assigns a fresh `rec.job.id` and picks the random source from
    /// `data.splitter.random.uniform` / `rec.random.seed`.
    pub fn new(mut conf: Configuration, registry: ComponentRegistry) -> Result<Self> {
        let random = RandomSource::from_conf(&conf)?;
        let writer = ResultWriter::from_conf(&conf)?;
        conf.set(keys::JOB_ID, Uuid::new_v4());
        info!(
            "Created job {} (uniform random: {})",
            conf.get_or(keys::JOB_ID, ""),
            random.is_uniform()
        );

        Ok(Self {
            conf,
            registry,
            provider: DataModelProvider::new(random),
            writer,
        })
    }

    pub fn job_id(&self) -> &str {
        self.conf.get_or(keys::JOB_ID, "")
    }

    pub fn conf(&self) -> &Configuration {
        &self.conf
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Overrides `rec.recommender.class` for subsequent runs
    pub fn set_recommender(&mut self, identifier: &str) {
        self.conf.set(keys::RECOMMENDER_CLASS, identifier);
    }

    /// Runs every fold the split mode implies.
    ///
    /// `kcv` runs folds 1..=N and `loocv` folds 0..N, with N from
    /// `data.splitter.cv.number`; `given` and `ratio` run once. Any fold
    /// error stops the job.
    pub fn run_job(&mut self) -> Result<JobReport> {
        let raw_mode = self.conf.require(keys::SPLITTER)?;
        let mode: SplitMode = raw_mode
            .parse()
            .map_err(|_| JobError::UnknownSplitMode(raw_mode.trim().to_string()))?;

        let folds: Vec<Option<u32>> = match mode {
            SplitMode::KFold => (1..=self.fold_count()?).map(Some).collect(),
            SplitMode::LeaveOneOut => (0..self.fold_count()?).map(Some).collect(),
            SplitMode::Given | SplitMode::Ratio => vec![None],
        };

        let mut report = JobReport {
            job_id: self.job_id().to_string(),
            split_mode: mode,
            folds: Vec::with_capacity(folds.len()),
        };

        for fold in folds {
            if let Some(index) = fold {
                info!("Splitter info: the index of {} splitter times is {}", mode, index);
            }
            let fold_conf = self.fold_conf(fold);
            let fold_report = self.execute_fold(&fold_conf, fold)?;
            report.folds.push(fold_report);
        }

        info!("Job {} finished {} fold(s)", report.job_id, report.folds.len());
        Ok(report)
    }

    fn fold_count(&self) -> Result<u32> {
        let count = self.conf.get_int_or(keys::CV_NUMBER, 1)?;
        u32::try_from(count).map_err(|e| {
            JobError::Conf(ConfError::InvalidValue {
                key: keys::CV_NUMBER.to_string(),
                value: count.to_string(),
                reason: e.to_string(),
            })
        })
    }

    fn fold_conf(&self, fold: Option<u32>) -> Configuration {
        let mut conf = self.conf.clone();
        if let Some(index) = fold {
            conf.set(keys::CV_INDEX, index);
        }
        conf
    }

    /// One pass of the pipeline, in fixed stage order
    #[instrument(skip(self, conf), fields(job = %self.job_id()))]
    fn execute_fold(&mut self, conf: &Configuration, fold: Option<u32>) -> Result<FoldReport> {
        let start_time = Instant::now();

        let data_model = self.provider.ensure_built(&self.registry, conf)?;

        let mut context = RecommenderContext::new(conf, data_model);
        let built = similarity::build_similarities(&self.registry, conf, data_model, &mut context)?;
        if built > 0 {
            info!("Context holds {} similarities", built);
        }

        let recommender_id = conf.require(keys::RECOMMENDER_CLASS)?;
        let mut recommender = self.registry.create_recommender(recommender_id, conf)?;
        recommender
            .recommend(&context)
            .map_err(|reason| JobError::Domain {
                stage: "recommend",
                reason,
            })?;

        let recommended = recommender.recommended_list().to_vec();
        info!(
            "{} produced {} recommendations",
            recommender.name(),
            recommended.len()
        );

        let evaluation = evaluation::run_evaluation(&self.registry, conf, recommender.as_ref())?;
        let recommended = filter::apply_filter(&self.registry, conf, recommended)?;
        let persist = self.writer.save(
            conf,
            recommender.name(),
            data_model.split_mode(),
            &recommended,
        )?;

        Ok(FoldReport {
            fold_index: fold,
            recommender: recommender.name().to_string(),
            recommendations: recommended.len(),
            evaluation,
            persist,
            elapsed_ms: start_time.elapsed().as_millis() as u64,
        })
    }
}
