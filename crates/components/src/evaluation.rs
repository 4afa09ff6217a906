//! Ranking evaluation: ground truth, ranked lists and the built-in measures.

use crate::traits::Evaluator;
use crate::types::RecommendedItem;
use data_model::{ItemId, RatingIndex, UserId};
use std::collections::{BTreeMap, HashSet};

/// What an evaluator scores against.
///
/// Users with no test items are ignored; users with test items but no
/// recommendations score zero.
#[derive(Debug, Clone, Default)]
pub struct EvalContext {
    ground_truth: BTreeMap<UserId, HashSet<ItemId>>,
    ranked: BTreeMap<UserId, Vec<ItemId>>,
    top_n: usize,
}

impl EvalContext {
    /// Builds the context from a test set and a recommendation list.
    ///
    /// Each user's items are ranked by score (highest first, stable on ties)
    /// and cut at `top_n`.
    pub fn new(test: &RatingIndex, recommended: &[RecommendedItem], top_n: usize) -> Self {
        let ground_truth = test
            .user_index()
            .iter()
            .map(|(user, ratings)| {
                let items = ratings.iter().map(|r| r.item_id.clone()).collect();
                (user.clone(), items)
            })
            .collect();

        let mut scored: BTreeMap<UserId, Vec<(&str, f64)>> = BTreeMap::new();
        for item in recommended {
            scored
                .entry(item.user_id.clone())
                .or_default()
                .push((item.item_id.as_str(), item.score));
        }
        let ranked = scored
            .into_iter()
            .map(|(user, mut items)| {
                items.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
                let items = items
                    .into_iter()
                    .take(top_n)
                    .map(|(item, _)| item.to_string())
                    .collect();
                (user, items)
            })
            .collect();

        Self {
            ground_truth,
            ranked,
            top_n,
        }
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// (ranked recommendations, relevant items) per evaluated user
    fn users(&self) -> impl Iterator<Item = (&[ItemId], &HashSet<ItemId>)> {
        self.ground_truth
            .iter()
            .filter(|(_, truth)| !truth.is_empty())
            .map(|(user, truth)| {
                let ranked = self.ranked.get(user).map(|v| v.as_slice()).unwrap_or(&[]);
                (ranked, truth)
            })
    }

    /// Mean of `per_user` over evaluated users, 0.0 when there are none
    fn average(&self, per_user: impl Fn(&[ItemId], &HashSet<ItemId>) -> f64) -> f64 {
        let (sum, count) = self
            .users()
            .fold((0.0, 0usize), |(sum, count), (ranked, truth)| {
                (sum + per_user(ranked, truth), count + 1)
            });
        if count == 0 { 0.0 } else { sum / count as f64 }
    }
}

fn hits(ranked: &[ItemId], truth: &HashSet<ItemId>) -> usize {
    ranked.iter().filter(|item| truth.contains(*item)).count()
}

/// Share of the top-N list that is relevant
pub struct PrecisionEvaluator;

impl Evaluator for PrecisionEvaluator {
    fn name(&self) -> &str {
        "precision"
    }

    fn evaluate(&self, context: &EvalContext) -> f64 {
        let n = context.top_n().max(1) as f64;
        context.average(|ranked, truth| hits(ranked, truth) as f64 / n)
    }
}

/// Share of relevant items found in the top-N list
pub struct RecallEvaluator;

impl Evaluator for RecallEvaluator {
    fn name(&self) -> &str {
        "recall"
    }

    fn evaluate(&self, context: &EvalContext) -> f64 {
        context.average(|ranked, truth| hits(ranked, truth) as f64 / truth.len() as f64)
    }
}

/// Normalized discounted cumulative gain with binary relevance
pub struct NdcgEvaluator;

impl Evaluator for NdcgEvaluator {
    fn name(&self) -> &str {
        "ndcg"
    }

    fn evaluate(&self, context: &EvalContext) -> f64 {
        let top_n = context.top_n();
        context.average(|ranked, truth| {
            let dcg: f64 = ranked
                .iter()
                .enumerate()
                .filter(|(_, item)| truth.contains(*item))
                .map(|(rank, _)| 1.0 / (rank as f64 + 2.0).log2())
                .sum();
            let ideal: f64 = (0..truth.len().min(top_n))
                .map(|rank| 1.0 / (rank as f64 + 2.0).log2())
                .sum();
            if ideal > 0.0 { dcg / ideal } else { 0.0 }
        })
    }
}

/// The measures reported when no evaluator is designated
pub fn builtin_evaluators() -> Vec<Box<dyn Evaluator>> {
    vec![
        Box::new(PrecisionEvaluator),
        Box::new(RecallEvaluator),
        Box::new(NdcgEvaluator),
    ]
}
