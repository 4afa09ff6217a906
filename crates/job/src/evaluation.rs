//! Evaluation dispatch.
//!
//! With `rec.eval.class` set, the recommender is scored by that evaluator
//! alone. Otherwise every measure the recommender supports is reported.

use crate::error::{JobError, Result};
use crate::registry::ComponentRegistry;
use components::{MeasureValue, Recommender};
use conf::{keys, Configuration};
use serde::Serialize;
use tracing::info;

/// What a fold's evaluation produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EvaluationReport {
    Designated { evaluator: String, value: f64 },
    Measures(Vec<(MeasureValue, f64)>),
}

impl EvaluationReport {
    /// Value for the named measure or evaluator
    pub fn value_of(&self, name: &str) -> Option<f64> {
        match self {
            EvaluationReport::Designated { evaluator, value } => {
                (evaluator == name).then_some(*value)
            }
            EvaluationReport::Measures(values) => values
                .iter()
                .find(|(measure, _)| measure.measure == name)
                .map(|(_, value)| *value),
        }
    }
}

/// Scores `recommender` if `rec.eval.enable` is true; `None` otherwise.
pub fn run_evaluation(
    registry: &ComponentRegistry,
    conf: &Configuration,
    recommender: &dyn Recommender,
) -> Result<Option<EvaluationReport>> {
    if !conf.get_bool(keys::EVAL_ENABLE)? {
        return Ok(None);
    }

    let report = match conf.get_non_empty(keys::EVAL_CLASS) {
        Some(identifier) => {
            let evaluator = registry.create_evaluator(identifier)?;
            let value = recommender
                .evaluate(evaluator.as_ref())
                .map_err(|reason| JobError::Domain {
                    stage: "evaluation",
                    reason,
                })?;
            info!("Evaluator info:{} is {}", evaluator.name(), value);
            EvaluationReport::Designated {
                evaluator: evaluator.name().to_string(),
                value,
            }
        }
        None => {
            let measures = recommender
                .evaluate_map()
                .map_err(|reason| JobError::Domain {
                    stage: "evaluation",
                    reason,
                })?;
            // NaN marks a measure with no value
            let measures: Vec<(MeasureValue, f64)> = measures
                .into_iter()
                .filter(|(_, value)| !value.is_nan())
                .collect();
            for (measure, value) in &measures {
                info!("Evaluator value:{} is {}", measure, value);
            }
            EvaluationReport::Measures(measures)
        }
    };

    Ok(Some(report))
}
