//! Maps configuration identifiers to component constructors.
//!
//! Data models, similarities and recommenders are constructed with the
//! configuration; evaluators and filters take no arguments.
//! Identifiers are matched case-insensitively.

use crate::error::{Capability, JobError, Result};
use components::filters::{PositiveScoreFilter, UniqueItemFilter};
use components::recommenders::{ItemKnnRecommender, MostPopularRecommender};
use components::{
    Evaluator, NdcgEvaluator, PrecisionEvaluator, RatingSimilarity, RecallEvaluator,
    RecommendedFilter, Recommender, Similarity,
};
use conf::Configuration;
use data_model::{DataModel, TextDataModel};
use std::collections::BTreeMap;

type WithConf<T> = Box<dyn Fn(&Configuration) -> anyhow::Result<Box<T>> + Send + Sync>;
type NoArg<T> = Box<dyn Fn() -> anyhow::Result<Box<T>> + Send + Sync>;

/// Typed registry of component constructors.
#[derive(Default)]
pub struct ComponentRegistry {
    data_models: BTreeMap<String, WithConf<dyn DataModel>>,
    similarities: BTreeMap<String, WithConf<dyn Similarity>>,
    recommenders: BTreeMap<String, WithConf<dyn Recommender>>,
    evaluators: BTreeMap<String, NoArg<dyn Evaluator>>,
    filters: BTreeMap<String, NoArg<dyn RecommendedFilter>>,
}

fn normalize(identifier: &str) -> String {
    identifier.trim().to_ascii_lowercase()
}

impl ComponentRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in component
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .register_data_model("text", |conf| Ok(Box::new(TextDataModel::new(conf)?)))
            .register_similarity("cos", |conf| Ok(Box::new(RatingSimilarity::cosine(conf)?)))
            .register_similarity("jaccard", |conf| {
                Ok(Box::new(RatingSimilarity::jaccard(conf)?))
            })
            .register_recommender("mostpopular", |conf| {
                Ok(Box::new(MostPopularRecommender::new(conf)?))
            })
            .register_recommender("itemknn", |conf| {
                Ok(Box::new(ItemKnnRecommender::new(conf)?))
            })
            .register_evaluator("precision", || Ok(Box::new(PrecisionEvaluator)))
            .register_evaluator("recall", || Ok(Box::new(RecallEvaluator)))
            .register_evaluator("ndcg", || Ok(Box::new(NdcgEvaluator)))
            .register_filter("positivescore", || Ok(Box::new(PositiveScoreFilter)))
            .register_filter("uniqueitem", || Ok(Box::new(UniqueItemFilter)));
        registry
    }

    pub fn register_data_model<F>(&mut self, identifier: &str, factory: F) -> &mut Self
    where
        F: Fn(&Configuration) -> anyhow::Result<Box<dyn DataModel>> + Send + Sync + 'static,
    {
        self.data_models.insert(normalize(identifier), Box::new(factory));
        self
    }

    pub fn register_similarity<F>(&mut self, identifier: &str, factory: F) -> &mut Self
    where
        F: Fn(&Configuration) -> anyhow::Result<Box<dyn Similarity>> + Send + Sync + 'static,
    {
        self.similarities.insert(normalize(identifier), Box::new(factory));
        self
    }

    pub fn register_recommender<F>(&mut self, identifier: &str, factory: F) -> &mut Self
    where
        F: Fn(&Configuration) -> anyhow::Result<Box<dyn Recommender>> + Send + Sync + 'static,
    {
        self.recommenders.insert(normalize(identifier), Box::new(factory));
        self
    }

    pub fn register_evaluator<F>(&mut self, identifier: &str, factory: F) -> &mut Self
    where
        F: Fn() -> anyhow::Result<Box<dyn Evaluator>> + Send + Sync + 'static,
    {
        self.evaluators.insert(normalize(identifier), Box::new(factory));
        self
    }

    pub fn register_filter<F>(&mut self, identifier: &str, factory: F) -> &mut Self
    where
        F: Fn() -> anyhow::Result<Box<dyn RecommendedFilter>> + Send + Sync + 'static,
    {
        self.filters.insert(normalize(identifier), Box::new(factory));
        self
    }

    /// Whether `identifier` resolves for `capability`
    pub fn contains(&self, capability: Capability, identifier: &str) -> bool {
        let key = normalize(identifier);
        match capability {
            Capability::DataModel => self.data_models.contains_key(&key),
            Capability::Similarity => self.similarities.contains_key(&key),
            Capability::Recommender => self.recommenders.contains_key(&key),
            Capability::Evaluator => self.evaluators.contains_key(&key),
            Capability::Filter => self.filters.contains_key(&key),
        }
    }

    /// Registered identifiers for `capability`, sorted
    pub fn identifiers(&self, capability: Capability) -> Vec<&str> {
        match capability {
            Capability::DataModel => self.data_models.keys().map(String::as_str).collect(),
            Capability::Similarity => self.similarities.keys().map(String::as_str).collect(),
            Capability::Recommender => self.recommenders.keys().map(String::as_str).collect(),
            Capability::Evaluator => self.evaluators.keys().map(String::as_str).collect(),
            Capability::Filter => self.filters.keys().map(String::as_str).collect(),
        }
    }

    pub fn create_data_model(
        &self,
        identifier: &str,
        conf: &Configuration,
    ) -> Result<Box<dyn DataModel>> {
        let factory = lookup(&self.data_models, Capability::DataModel, identifier)?;
        construct(Capability::DataModel, identifier, || factory(conf))
    }

    pub fn create_similarity(
        &self,
        identifier: &str,
        conf: &Configuration,
    ) -> Result<Box<dyn Similarity>> {
        let factory = lookup(&self.similarities, Capability::Similarity, identifier)?;
        construct(Capability::Similarity, identifier, || factory(conf))
    }

    pub fn create_recommender(
        &self,
        identifier: &str,
        conf: &Configuration,
    ) -> Result<Box<dyn Recommender>> {
        let factory = lookup(&self.recommenders, Capability::Recommender, identifier)?;
        construct(Capability::Recommender, identifier, || factory(conf))
    }

    pub fn create_evaluator(&self, identifier: &str) -> Result<Box<dyn Evaluator>> {
        let factory = lookup(&self.evaluators, Capability::Evaluator, identifier)?;
        construct(Capability::Evaluator, identifier, || factory())
    }

    pub fn create_filter(&self, identifier: &str) -> Result<Box<dyn RecommendedFilter>> {
        let factory = lookup(&self.filters, Capability::Filter, identifier)?;
        construct(Capability::Filter, identifier, || factory())
    }
}

fn lookup<'r, F>(
    table: &'r BTreeMap<String, F>,
    capability: Capability,
    identifier: &str,
) -> Result<&'r F> {
    table
        .get(&normalize(identifier))
        .ok_or_else(|| JobError::ComponentNotFound {
            capability,
            identifier: identifier.to_string(),
        })
}

fn construct<T: ?Sized>(
    capability: Capability,
    identifier: &str,
    build: impl FnOnce() -> anyhow::Result<Box<T>>,
) -> Result<Box<T>> {
    build().map_err(|reason| JobError::ComponentConstruction {
        capability,
        identifier: identifier.to_string(),
        reason,
    })
}
