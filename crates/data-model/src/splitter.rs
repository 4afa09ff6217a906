//! Train/test splitting strategies.
//!
//! A [`DataSplitter`] is created once per data model and asked to split on
//! every build. Fold assignments (k-fold) and per-user hold-out orders
//! (leave-one-out) are drawn on the first split and reused, so later folds
//! see a consistent partition even with a uniform random source.

use crate::error::{DataModelError, Result};
use crate::random::RandomSource;
use crate::types::{Rating, RatingIndex, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// How the data is partitioned into train and test sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SplitMode {
    /// `kcv`: k-fold cross validation, folds indexed 1..=N
    KFold,
    /// `loocv`: leave-one-out, folds indexed 0..N
    LeaveOneOut,
    /// `given`: a separate test file
    Given,
    /// `ratio`: one random train/test cut
    Ratio,
}

impl SplitMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitMode::KFold => "kcv",
            SplitMode::LeaveOneOut => "loocv",
            SplitMode::Given => "given",
            SplitMode::Ratio => "ratio",
        }
    }

    /// Whether runs under this mode carry a fold index
    pub fn is_cross_validation(&self) -> bool {
        matches!(self, SplitMode::KFold | SplitMode::LeaveOneOut)
    }
}

impl FromStr for SplitMode {
    type Err = DataModelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "kcv" => Ok(SplitMode::KFold),
            "loocv" => Ok(SplitMode::LeaveOneOut),
            "given" => Ok(SplitMode::Given),
            "ratio" => Ok(SplitMode::Ratio),
            other => Err(DataModelError::UnknownSplitMode(other.to_string())),
        }
    }
}

impl fmt::Display for SplitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one split
#[derive(Debug, Clone, Default)]
pub struct SplitResult {
    pub train: RatingIndex,
    pub test: RatingIndex,
}

#[derive(Debug, Clone)]
pub struct DataSplitter {
    mode: SplitMode,
    train_ratio: f64,
    folds: u32,
    /// Fold number per rating position (k-fold)
    fold_assignment: Option<Vec<u32>>,
    /// Shuffled rating positions per user (leave-one-out)
    holdout_order: Option<BTreeMap<UserId, Vec<usize>>>,
}

impl DataSplitter {
    pub fn new(mode: SplitMode) -> Self {
        Self {
            mode,
            train_ratio: 0.8,
            folds: 1,
            fold_assignment: None,
            holdout_order: None,
        }
    }

    /// Train share for ratio splits (default: 0.8)
    pub fn with_train_ratio(mut self, ratio: f64) -> Self {
        self.train_ratio = ratio;
        self
    }

    /// Fold count for k-fold splits (default: 1)
    pub fn with_folds(mut self, folds: u32) -> Self {
        self.folds = folds;
        self
    }

    pub fn mode(&self) -> SplitMode {
        self.mode
    }

    /// Split `ratings` for the given fold.
    ///
    /// `given_test` is only consulted in [`SplitMode::Given`].
    pub fn split(
        &mut self,
        ratings: &[Rating],
        given_test: Option<&[Rating]>,
        fold: Option<u32>,
        random: &mut RandomSource,
    ) -> Result<SplitResult> {
        match self.mode {
            SplitMode::Ratio => self.split_ratio(ratings, random),
            SplitMode::KFold => self.split_kfold(ratings, fold.unwrap_or(1), random),
            SplitMode::LeaveOneOut => self.split_loo(ratings, fold.unwrap_or(0), random),
            SplitMode::Given => {
                let test = given_test.ok_or_else(|| {
                    DataModelError::InvalidSplit("given split requires a test set".to_string())
                })?;
                Ok(SplitResult {
                    train: RatingIndex::from_ratings(ratings.iter().cloned()),
                    test: RatingIndex::from_ratings(test.iter().cloned()),
                })
            }
        }
    }

    fn split_ratio(&self, ratings: &[Rating], random: &mut RandomSource) -> Result<SplitResult> {
        if !(self.train_ratio > 0.0 && self.train_ratio <= 1.0) {
            return Err(DataModelError::InvalidSplit(format!(
                "train ratio must be in (0, 1], got {}",
                self.train_ratio
            )));
        }

        let mut positions: Vec<usize> = (0..ratings.len()).collect();
        random.shuffle(&mut positions);
        let cut = (ratings.len() as f64 * self.train_ratio).round() as usize;

        let mut result = SplitResult::default();
        for (rank, &pos) in positions.iter().enumerate() {
            let rating = ratings[pos].clone();
            if rank < cut {
                result.train.insert_rating(rating);
            } else {
                result.test.insert_rating(rating);
            }
        }
        Ok(result)
    }

    fn split_kfold(
        &mut self,
        ratings: &[Rating],
        fold: u32,
        random: &mut RandomSource,
    ) -> Result<SplitResult> {
        if self.folds == 0 {
            return Err(DataModelError::InvalidSplit(
                "k-fold split needs at least one fold".to_string(),
            ));
        }
        if fold < 1 || fold > self.folds {
            return Err(DataModelError::InvalidSplit(format!(
                "fold {} outside 1..={}",
                fold, self.folds
            )));
        }

        let folds = self.folds;
        let assignment = self.fold_assignment.get_or_insert_with(|| {
            let mut positions: Vec<usize> = (0..ratings.len()).collect();
            random.shuffle(&mut positions);
            let mut assignment = vec![0; ratings.len()];
            for (rank, pos) in positions.into_iter().enumerate() {
                assignment[pos] = (rank as u32 % folds) + 1;
            }
            assignment
        });
        if assignment.len() != ratings.len() {
            return Err(DataModelError::InvalidSplit(
                "rating count changed between folds".to_string(),
            ));
        }

        let mut result = SplitResult::default();
        for (rating, &assigned) in ratings.iter().zip(assignment.iter()) {
            if assigned == fold {
                result.test.insert_rating(rating.clone());
            } else {
                result.train.insert_rating(rating.clone());
            }
        }
        Ok(result)
    }

    fn split_loo(
        &mut self,
        ratings: &[Rating],
        fold: u32,
        random: &mut RandomSource,
    ) -> Result<SplitResult> {
        let order = self.holdout_order.get_or_insert_with(|| {
            let mut order: BTreeMap<UserId, Vec<usize>> = BTreeMap::new();
            for (pos, rating) in ratings.iter().enumerate() {
                order.entry(rating.user_id.clone()).or_default().push(pos);
            }
            for positions in order.values_mut() {
                random.shuffle(positions);
            }
            order
        });

        let mut held_out = vec![false; ratings.len()];
        for positions in order.values() {
            // users with a single rating keep it for training
            if positions.len() < 2 {
                continue;
            }
            let pos = positions[fold as usize % positions.len()];
            match held_out.get_mut(pos) {
                Some(slot) => *slot = true,
                None => {
                    return Err(DataModelError::InvalidSplit(
                        "rating count changed between folds".to_string(),
                    ));
                }
            }
        }

        let mut result = SplitResult::default();
        for (rating, &is_test) in ratings.iter().zip(held_out.iter()) {
            if is_test {
                result.test.insert_rating(rating.clone());
            } else {
                result.train.insert_rating(rating.clone());
            }
        }
        Ok(result)
    }
}
