//! Built-in recommenders.
//!
//! Both produce a top-N list of unseen items for every user in the test
//! set. The list is ordered by user id, then score descending.

pub mod item_knn;
pub mod most_popular;

pub use item_knn::ItemKnnRecommender;
pub use most_popular::MostPopularRecommender;

use crate::types::RecommendedItem;
use anyhow::Result;
use conf::{keys, Configuration};
use data_model::RatingIndex;
use rayon::prelude::*;
use std::collections::HashSet;

pub(crate) fn top_n_from_conf(conf: &Configuration) -> Result<usize> {
    let top_n = conf.get_int_or(keys::RANKING_TOP_N, 10)?;
    anyhow::ensure!(top_n > 0, "{} must be positive, got {}", keys::RANKING_TOP_N, top_n);
    Ok(top_n as usize)
}

/// Scores candidates for every test user in parallel and keeps the top N.
///
/// `score` receives the user and the items they rated in training, and
/// returns (item, score) candidates; seen items are dropped afterwards.
pub(crate) fn rank_for_test_users<F>(
    train: &RatingIndex,
    test: &RatingIndex,
    top_n: usize,
    score: F,
) -> Vec<RecommendedItem>
where
    F: Fn(&str, &HashSet<&str>) -> Vec<(String, f64)> + Sync,
{
    let users: Vec<&str> = test.users().collect();
    users
        .par_iter()
        .map(|&user| {
            let seen = train.user_items(user);
            let mut candidates: Vec<(String, f64)> = score(user, &seen)
                .into_iter()
                .filter(|(item, _)| !seen.contains(item.as_str()))
                .collect();
            candidates.sort_by(|a, b| {
                b.1.partial_cmp(&a.1)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.0.cmp(&b.0))
            });
            candidates.truncate(top_n);
            candidates
                .into_iter()
                .map(|(item, s)| RecommendedItem::new(user, item, s))
                .collect::<Vec<_>>()
        })
        .flatten()
        .collect()
}
