//! Per-fold execution context handed to a recommender.

use crate::traits::Similarity;
use conf::Configuration;
use data_model::DataModel;
use std::sync::Arc;

/// Configuration, data model and similarities for one fold.
///
/// Similarities keep insertion order. The primary similarity is the one
/// single-similarity recommenders use.
pub struct RecommenderContext<'a> {
    conf: &'a Configuration,
    data_model: &'a dyn DataModel,
    similarity: Option<Arc<dyn Similarity>>,
    similarities: Vec<(String, Arc<dyn Similarity>)>,
}

impl<'a> RecommenderContext<'a> {
    pub fn new(conf: &'a Configuration, data_model: &'a dyn DataModel) -> Self {
        Self {
            conf,
            data_model,
            similarity: None,
            similarities: Vec::new(),
        }
    }

    pub fn conf(&self) -> &Configuration {
        self.conf
    }

    pub fn data_model(&self) -> &dyn DataModel {
        self.data_model
    }

    /// The primary similarity, if any was built
    pub fn similarity(&self) -> Option<&Arc<dyn Similarity>> {
        self.similarity.as_ref()
    }

    pub fn set_similarity(&mut self, similarity: Arc<dyn Similarity>) {
        self.similarity = Some(similarity);
    }

    /// Registers a similarity under `key`, replacing any earlier one in place
    pub fn add_similarity(&mut self, key: impl Into<String>, similarity: Arc<dyn Similarity>) {
        let key = key.into();
        match self.similarities.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = similarity,
            None => self.similarities.push((key, similarity)),
        }
    }

    pub fn get_similarity(&self, key: &str) -> Option<&Arc<dyn Similarity>> {
        self.similarities
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, similarity)| similarity)
    }

    /// Registered similarities in insertion order
    pub fn similarities(&self) -> impl Iterator<Item = (&str, &Arc<dyn Similarity>)> {
        self.similarities.iter().map(|(k, s)| (k.as_str(), s))
    }

    pub fn similarity_count(&self) -> usize {
        self.similarities.len()
    }
}
