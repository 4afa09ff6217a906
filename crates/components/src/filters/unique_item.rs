//! Filter to remove repeated (user, item) pairs.
//!
//! Keeps the first occurrence so the input order survives.

use crate::traits::RecommendedFilter;
use crate::types::RecommendedItem;
use anyhow::Result;
use std::collections::HashSet;

pub struct UniqueItemFilter;

impl RecommendedFilter for UniqueItemFilter {
    fn name(&self) -> &str {
        "UniqueItemFilter"
    }

    fn filter(&self, items: Vec<RecommendedItem>) -> Result<Vec<RecommendedItem>> {
        let mut seen: HashSet<(String, String)> = HashSet::new();
        let filtered: Vec<RecommendedItem> = items
            .into_iter()
            .filter(|item| seen.insert((item.user_id.clone(), item.item_id.clone())))
            .collect();
        Ok(filtered)
    }
}
