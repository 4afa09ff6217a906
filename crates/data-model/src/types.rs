//! Core rating types.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Raw user identifier as it appears in the input file
pub type UserId = String;

/// Raw item identifier as it appears in the input file
pub type ItemId = String;

/// One user→item interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub item_id: ItemId,
    /// Explicit rating, or 1.0 for implicit feedback
    pub value: f64,
    pub timestamp: Option<i64>,
}

impl Rating {
    pub fn new(user_id: impl Into<UserId>, item_id: impl Into<ItemId>, value: f64) -> Self {
        Self {
            user_id: user_id.into(),
            item_id: item_id.into(),
            value,
            timestamp: None,
        }
    }
}

/// A set of ratings indexed by user and by item.
///
/// Both indices are ordered maps so iteration order is stable across runs.
#[derive(Debug, Clone, Default)]
pub struct RatingIndex {
    user_ratings: BTreeMap<UserId, Vec<Rating>>,
    item_ratings: BTreeMap<ItemId, Vec<Rating>>,
    total: usize,
}

impl RatingIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ratings<I>(ratings: I) -> Self
    where
        I: IntoIterator<Item = Rating>,
    {
        let mut index = Self::new();
        for rating in ratings {
            index.insert_rating(rating);
        }
        index
    }

    /// Insert a rating into both indices
    pub fn insert_rating(&mut self, rating: Rating) {
        self.item_ratings
            .entry(rating.item_id.clone())
            .or_default()
            .push(rating.clone());
        self.user_ratings
            .entry(rating.user_id.clone())
            .or_default()
            .push(rating);
        self.total += 1;
    }

    /// All ratings made by a user, empty if unknown
    pub fn get_user_ratings(&self, user_id: &str) -> &[Rating] {
        self.user_ratings
            .get(user_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// All ratings received by an item, empty if unknown
    pub fn get_item_ratings(&self, item_id: &str) -> &[Rating] {
        self.item_ratings
            .get(item_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Items a user has interacted with
    pub fn user_items(&self, user_id: &str) -> HashSet<&str> {
        self.get_user_ratings(user_id)
            .iter()
            .map(|r| r.item_id.as_str())
            .collect()
    }

    /// Users in ascending id order
    pub fn users(&self) -> impl Iterator<Item = &str> {
        self.user_ratings.keys().map(String::as_str)
    }

    /// Items in ascending id order
    pub fn items(&self) -> impl Iterator<Item = &str> {
        self.item_ratings.keys().map(String::as_str)
    }

    pub fn user_index(&self) -> &BTreeMap<UserId, Vec<Rating>> {
        &self.user_ratings
    }

    pub fn item_index(&self) -> &BTreeMap<ItemId, Vec<Rating>> {
        &self.item_ratings
    }

    /// Number of ratings per item, most popular first (ties by item id)
    pub fn item_popularity(&self) -> Vec<(&str, usize)> {
        let mut popularity: Vec<(&str, usize)> = self
            .item_ratings
            .par_iter()
            .map(|(item_id, ratings)| (item_id.as_str(), ratings.len()))
            .collect();
        popularity.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        popularity
    }

    /// (users, items, ratings)
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.user_ratings.len(), self.item_ratings.len(), self.total)
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
