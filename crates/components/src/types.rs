//! Values flowing out of a recommender.

use data_model::{ItemId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One scored recommendation. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedItem {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub score: f64,
}

impl RecommendedItem {
    pub fn new(user_id: impl Into<UserId>, item_id: impl Into<ItemId>, score: f64) -> Self {
        Self {
            user_id: user_id.into(),
            item_id: item_id.into(),
            score,
        }
    }
}

/// Identifies one evaluation result: a measure name and optional top-N cutoff.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeasureValue {
    pub measure: String,
    pub top_n: Option<u32>,
}

impl MeasureValue {
    pub fn new(measure: impl Into<String>, top_n: Option<u32>) -> Self {
        Self {
            measure: measure.into(),
            top_n,
        }
    }
}

impl fmt::Display for MeasureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.top_n {
            Some(n) if n > 0 => write!(f, "{} top {}", self.measure, n),
            _ => f.write_str(&self.measure),
        }
    }
}
