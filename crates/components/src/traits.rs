//! Capability traits the job runner drives.
//!
//! Implementations are pluggable and selected by configuration; the job
//! only ever sees them through these traits.

use crate::context::RecommenderContext;
use crate::evaluation::{self, EvalContext};
use crate::similarity::SimilarityMatrix;
use crate::types::{MeasureValue, RecommendedItem};
use anyhow::{Result, anyhow};
use data_model::DataModel;
use std::collections::BTreeMap;

/// Builds a similarity matrix from the current data model.
pub trait Similarity: Send + Sync {
    fn name(&self) -> &str;

    fn build_similarity_matrix(&mut self, data_model: &dyn DataModel) -> Result<()>;

    fn matrix(&self) -> &SimilarityMatrix;
}

/// A recommendation algorithm.
///
/// ## Design Note
/// Evaluation has default implementations on top of
/// [`eval_context`](Recommender::eval_context); a recommender that keeps its
/// own ground truth only needs to expose it.
pub trait Recommender: Send {
    /// Short display name, also used for the output directory
    fn name(&self) -> &str;

    /// Train on the context's data model and produce recommendations
    fn recommend(&mut self, context: &RecommenderContext<'_>) -> Result<()>;

    /// Recommendations from the last `recommend` call
    fn recommended_list(&self) -> &[RecommendedItem];

    /// Ground truth and ranked lists for scoring, once `recommend` has run
    fn eval_context(&self) -> Option<&EvalContext> {
        None
    }

    /// Score with a single designated evaluator
    fn evaluate(&self, evaluator: &dyn Evaluator) -> Result<f64> {
        let context = self
            .eval_context()
            .ok_or_else(|| anyhow!("{} has no evaluation context", self.name()))?;
        Ok(evaluator.evaluate(context))
    }

    /// Score with every built-in measure
    fn evaluate_map(&self) -> Result<BTreeMap<MeasureValue, f64>> {
        let context = self
            .eval_context()
            .ok_or_else(|| anyhow!("{} has no evaluation context", self.name()))?;
        let top_n = u32::try_from(context.top_n()).ok();
        Ok(evaluation::builtin_evaluators()
            .iter()
            .map(|evaluator| {
                (
                    MeasureValue::new(evaluator.name(), top_n),
                    evaluator.evaluate(context),
                )
            })
            .collect())
    }
}

/// A single evaluation measure.
pub trait Evaluator: Send + Sync {
    fn name(&self) -> &str;

    fn evaluate(&self, context: &EvalContext) -> f64;
}

/// Post-processes a recommendation list before it is saved.
///
/// Filters take ownership of the list and return the transformed list.
pub trait RecommendedFilter: Send + Sync {
    fn name(&self) -> &str;

    fn filter(&self, items: Vec<RecommendedItem>) -> Result<Vec<RecommendedItem>>;
}
