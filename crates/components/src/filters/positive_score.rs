//! Filter to drop recommendations that carry no usable score.

use crate::traits::RecommendedFilter;
use crate::types::RecommendedItem;
use anyhow::Result;

/// Removes items whose score is NaN, infinite, or not above zero.
pub struct PositiveScoreFilter;

impl RecommendedFilter for PositiveScoreFilter {
    fn name(&self) -> &str {
        "PositiveScoreFilter"
    }

    fn filter(&self, items: Vec<RecommendedItem>) -> Result<Vec<RecommendedItem>> {
        let filtered: Vec<RecommendedItem> = items
            .into_iter()
            .filter(|item| item.score.is_finite() && item.score > 0.0)
            .collect();
        Ok(filtered)
    }
}
