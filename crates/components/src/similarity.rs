//! Similarity matrices computed from the training ratings.
//!
//! ## Algorithm
//! 1. Build one sparse rating vector per entity (user or item)
//! 2. For each entity, collect co-rated candidates through the opposite index
//! 3. Score every candidate pair with the configured measure
//! 4. Keep the top-k neighbours per entity
//!
//! Rows are computed in parallel with Rayon.

use crate::traits::Similarity;
use anyhow::{Result, bail};
use conf::{keys, Configuration};
use data_model::{DataModel, Rating, RatingIndex};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use tracing::debug;

/// Which side of the rating matrix is compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimilarityKind {
    User,
    Item,
}

impl SimilarityKind {
    /// Reads `rec.recommender.similarity.key`; defaults to `user`
    pub fn from_conf(conf: &Configuration) -> Result<Self> {
        match conf.get_non_empty(keys::SIMILARITY_KEY).unwrap_or("user") {
            "user" => Ok(SimilarityKind::User),
            "item" => Ok(SimilarityKind::Item),
            other => bail!("unknown similarity key '{}', expected user or item", other),
        }
    }
}

impl fmt::Display for SimilarityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimilarityKind::User => f.write_str("user"),
            SimilarityKind::Item => f.write_str("item"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub id: String,
    pub similarity: f64,
}

/// Sparse, row-truncated similarity matrix
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    kind: SimilarityKind,
    rows: BTreeMap<String, Vec<Neighbor>>,
}

impl SimilarityMatrix {
    pub fn new(kind: SimilarityKind) -> Self {
        Self {
            kind,
            rows: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> SimilarityKind {
        self.kind
    }

    /// Neighbours of `id`, most similar first
    pub fn neighbors(&self, id: &str) -> &[Neighbor] {
        self.rows.get(id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Similarity of `a` to `b`, 0.0 when `b` is not among `a`'s neighbours
    pub fn get(&self, a: &str, b: &str) -> f64 {
        self.neighbors(a)
            .iter()
            .find(|n| n.id == b)
            .map(|n| n.similarity)
            .unwrap_or(0.0)
    }

    pub fn insert_row(&mut self, id: impl Into<String>, neighbors: Vec<Neighbor>) {
        self.rows.insert(id.into(), neighbors);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimilarityMeasure {
    Cosine,
    Jaccard,
}

impl SimilarityMeasure {
    fn score(&self, a: &HashMap<&str, f64>, b: &HashMap<&str, f64>) -> f64 {
        match self {
            SimilarityMeasure::Cosine => {
                let dot: f64 = a
                    .iter()
                    .filter_map(|(k, va)| b.get(k).map(|vb| va * vb))
                    .sum();
                let norm_a = a.values().map(|v| v * v).sum::<f64>().sqrt();
                let norm_b = b.values().map(|v| v * v).sum::<f64>().sqrt();
                if norm_a == 0.0 || norm_b == 0.0 {
                    0.0
                } else {
                    dot / (norm_a * norm_b)
                }
            }
            SimilarityMeasure::Jaccard => {
                let shared = a.keys().filter(|k| b.contains_key(*k)).count();
                let union = a.len() + b.len() - shared;
                if union == 0 {
                    0.0
                } else {
                    shared as f64 / union as f64
                }
            }
        }
    }
}

/// Similarity over rating vectors (`cos` or `jaccard`)
pub struct RatingSimilarity {
    measure: SimilarityMeasure,
    knn: usize,
    matrix: SimilarityMatrix,
}

impl RatingSimilarity {
    /// Reads the kind from `rec.recommender.similarity.key` and the row
    /// length from `rec.neighbors.knn.number`
    pub fn new(measure: SimilarityMeasure, conf: &Configuration) -> Result<Self> {
        let kind = SimilarityKind::from_conf(conf)?;
        let knn = conf.get_int_or(keys::NEIGHBORS_KNN, 50)?;
        if knn <= 0 {
            bail!("{} must be positive, got {}", keys::NEIGHBORS_KNN, knn);
        }
        Ok(Self {
            measure,
            knn: knn as usize,
            matrix: SimilarityMatrix::new(kind),
        })
    }

    pub fn cosine(conf: &Configuration) -> Result<Self> {
        Self::new(SimilarityMeasure::Cosine, conf)
    }

    pub fn jaccard(conf: &Configuration) -> Result<Self> {
        Self::new(SimilarityMeasure::Jaccard, conf)
    }

    /// Computes the matrix for `kind` over `train`
    pub fn compute(&self, kind: SimilarityKind, train: &RatingIndex) -> SimilarityMatrix {
        let (own, opposite) = match kind {
            SimilarityKind::User => (train.user_index(), train.item_index()),
            SimilarityKind::Item => (train.item_index(), train.user_index()),
        };
        // entity -> {other side id -> value}
        let vectors: HashMap<&str, HashMap<&str, f64>> = own
            .iter()
            .map(|(id, ratings)| {
                let vector = ratings
                    .iter()
                    .map(|r| (other_id(kind, r), r.value))
                    .collect();
                (id.as_str(), vector)
            })
            .collect();

        let rows: Vec<(String, Vec<Neighbor>)> = own
            .par_iter()
            .filter_map(|(id, _)| {
                let vector = vectors.get(id.as_str())?;
                let mut candidates: HashSet<&str> = HashSet::new();
                for other_side in vector.keys() {
                    if let Some(ratings) = opposite.get(*other_side) {
                        for rating in ratings {
                            let candidate = own_id(kind, rating);
                            if candidate != id.as_str() {
                                candidates.insert(candidate);
                            }
                        }
                    }
                }

                let mut neighbors: Vec<Neighbor> = candidates
                    .into_iter()
                    .filter_map(|candidate| {
                        let other = vectors.get(candidate)?;
                        let similarity = self.measure.score(vector, other);
                        (similarity > 0.0).then(|| Neighbor {
                            id: candidate.to_string(),
                            similarity,
                        })
                    })
                    .collect();
                neighbors.sort_by(|a, b| {
                    b.similarity
                        .partial_cmp(&a.similarity)
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then_with(|| a.id.cmp(&b.id))
                });
                neighbors.truncate(self.knn);
                Some((id.clone(), neighbors))
            })
            .collect();

        let mut matrix = SimilarityMatrix::new(kind);
        for (id, neighbors) in rows {
            matrix.insert_row(id, neighbors);
        }
        matrix
    }
}

/// Id of the entity a rating belongs to under `kind`
fn own_id(kind: SimilarityKind, rating: &Rating) -> &str {
    match kind {
        SimilarityKind::User => &rating.user_id,
        SimilarityKind::Item => &rating.item_id,
    }
}

/// Id on the opposite side of the rating matrix
fn other_id(kind: SimilarityKind, rating: &Rating) -> &str {
    match kind {
        SimilarityKind::User => &rating.item_id,
        SimilarityKind::Item => &rating.user_id,
    }
}

impl Similarity for RatingSimilarity {
    fn name(&self) -> &str {
        match self.measure {
            SimilarityMeasure::Cosine => "cos",
            SimilarityMeasure::Jaccard => "jaccard",
        }
    }

    fn build_similarity_matrix(&mut self, data_model: &dyn DataModel) -> Result<()> {
        let kind = self.matrix.kind();
        self.matrix = self.compute(kind, data_model.train_set());
        debug!(
            "Built {} {} similarity matrix with {} rows",
            self.name(),
            kind,
            self.matrix.len()
        );
        Ok(())
    }

    fn matrix(&self) -> &SimilarityMatrix {
        &self.matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn train() -> RatingIndex {
        RatingIndex::from_ratings(vec![
            Rating::new("u1", "a", 5.0),
            Rating::new("u1", "b", 3.0),
            Rating::new("u2", "a", 5.0),
            Rating::new("u2", "b", 3.0),
            Rating::new("u3", "c", 4.0),
        ])
    }

    #[test]
    fn test_kind_from_conf() {
        let mut conf = Configuration::new();
        assert_eq!(SimilarityKind::from_conf(&conf).unwrap(), SimilarityKind::User);
        conf.set(keys::SIMILARITY_KEY, "item");
        assert_eq!(SimilarityKind::from_conf(&conf).unwrap(), SimilarityKind::Item);
        conf.set(keys::SIMILARITY_KEY, "social");
        assert!(SimilarityKind::from_conf(&conf).is_err());
    }

    #[test]
    fn test_cosine_user_similarity() {
        let similarity = RatingSimilarity::cosine(&Configuration::new()).unwrap();
        let matrix = similarity.compute(SimilarityKind::User, &train());

        assert!((matrix.get("u1", "u2") - 1.0).abs() < 1e-9);
        // u3 shares nothing with anyone
        assert!(matrix.neighbors("u3").is_empty());
        assert_eq!(matrix.get("u1", "u3"), 0.0);
    }

    #[test]
    fn test_jaccard_item_similarity() {
        let similarity = RatingSimilarity::jaccard(&Configuration::new()).unwrap();
        let matrix = similarity.compute(SimilarityKind::Item, &train());

        assert_eq!(matrix.kind(), SimilarityKind::Item);
        assert!((matrix.get("a", "b") - 1.0).abs() < 1e-9);
        assert_eq!(matrix.get("a", "c"), 0.0);
    }

    #[test]
    fn test_knn_truncates_rows() {
        let mut conf = Configuration::new();
        conf.set(keys::NEIGHBORS_KNN, 1);
        let ratings: Vec<Rating> = (0..5)
            .map(|u| Rating::new(format!("u{}", u), "shared", 1.0))
            .collect();
        let similarity = RatingSimilarity::cosine(&conf).unwrap();
        let matrix = similarity.compute(SimilarityKind::User, &RatingIndex::from_ratings(ratings));
        assert_eq!(matrix.neighbors("u0").len(), 1);
        assert_eq!(matrix.neighbors("u0")[0].id, "u1");
    }
}
