//! Recording mock components shared by the job tests.

#![allow(dead_code)]

use anyhow::{anyhow, bail};
use components::{
    EvalContext, Evaluator, MeasureValue, RecommendedFilter, RecommendedItem, Recommender,
    RecommenderContext, Similarity, SimilarityKind, SimilarityMatrix,
};
use conf::{keys, Configuration};
use data_model::{DataModel, RandomSource, Rating, RatingIndex, SplitMode};
use job::ComponentRegistry;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Shared log of what the mocks were asked to do
#[derive(Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<String>>>,
    constructions: Arc<AtomicUsize>,
}

impl Recorder {
    pub fn push(&self, event: impl Into<String>) {
        self.events.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn matching(&self, prefix: &str) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|event| event.starts_with(prefix))
            .collect()
    }

    pub fn constructions(&self) -> usize {
        self.constructions.load(Ordering::SeqCst)
    }
}

pub struct MockDataModel {
    recorder: Recorder,
    mode: Option<SplitMode>,
    fail_build: bool,
    train: RatingIndex,
    test: RatingIndex,
}

impl DataModel for MockDataModel {
    fn build_data_model(
        &mut self,
        conf: &Configuration,
        _random: &mut RandomSource,
    ) -> anyhow::Result<()> {
        self.recorder
            .push(format!("build fold={:?}", conf.fold_index()?));
        if self.fail_build {
            bail!("ratings file is unreadable");
        }
        self.train = RatingIndex::from_ratings(vec![
            Rating::new("u1", "a", 4.0),
            Rating::new("u2", "b", 3.0),
        ]);
        self.test = RatingIndex::from_ratings(vec![
            Rating::new("u1", "c", 5.0),
            Rating::new("u2", "d", 1.0),
        ]);
        Ok(())
    }

    fn split_mode(&self) -> Option<SplitMode> {
        self.mode
    }

    fn train_set(&self) -> &RatingIndex {
        &self.train
    }

    fn test_set(&self) -> &RatingIndex {
        &self.test
    }
}

pub struct MockSimilarity {
    recorder: Recorder,
    key: String,
    matrix: SimilarityMatrix,
}

impl Similarity for MockSimilarity {
    fn name(&self) -> &str {
        &self.key
    }

    fn build_similarity_matrix(&mut self, _data_model: &dyn DataModel) -> anyhow::Result<()> {
        self.recorder.push(format!("similarity {}", self.key));
        Ok(())
    }

    fn matrix(&self) -> &SimilarityMatrix {
        &self.matrix
    }
}

pub struct MockRecommender {
    recorder: Recorder,
    items: Vec<RecommendedItem>,
    fail: bool,
    recommended: Vec<RecommendedItem>,
    eval_context: Option<EvalContext>,
}

impl Recommender for MockRecommender {
    fn name(&self) -> &str {
        "Mock"
    }

    fn recommend(&mut self, context: &RecommenderContext<'_>) -> anyhow::Result<()> {
        let primary = context.similarity().map(|s| s.name().to_string());
        self.recorder.push(format!(
            "recommend fold={:?} similarities={} primary={:?}",
            context.conf().fold_index()?,
            context.similarity_count(),
            primary
        ));
        if self.fail {
            return Err(anyhow!("model diverged"));
        }
        self.recommended = self.items.clone();
        self.eval_context = Some(EvalContext::new(
            context.data_model().test_set(),
            &self.recommended,
            10,
        ));
        Ok(())
    }

    fn recommended_list(&self) -> &[RecommendedItem] {
        &self.recommended
    }

    fn eval_context(&self) -> Option<&EvalContext> {
        self.eval_context.as_ref()
    }

    fn evaluate_map(&self) -> anyhow::Result<BTreeMap<MeasureValue, f64>> {
        self.recorder.push("evaluate all");
        Ok(BTreeMap::from([
            (MeasureValue::new("precision", Some(10)), 0.5),
            (MeasureValue::new("auc", None), f64::NAN),
        ]))
    }
}

pub struct MockEvaluator {
    recorder: Recorder,
}

impl Evaluator for MockEvaluator {
    fn name(&self) -> &str {
        "mock"
    }

    fn evaluate(&self, _context: &EvalContext) -> f64 {
        self.recorder.push("evaluate mock");
        0.25
    }
}

/// Drops every recommendation for `u2`
pub struct MockFilter {
    recorder: Recorder,
}

impl RecommendedFilter for MockFilter {
    fn name(&self) -> &str {
        "mock"
    }

    fn filter(&self, items: Vec<RecommendedItem>) -> anyhow::Result<Vec<RecommendedItem>> {
        self.recorder.push("filter");
        Ok(items.into_iter().filter(|item| item.user_id != "u2").collect())
    }
}

pub fn sample_items() -> Vec<RecommendedItem> {
    vec![
        RecommendedItem::new("u1", "c", 0.9),
        RecommendedItem::new("u1", "d", 0.5),
        RecommendedItem::new("u2", "a", 1.0),
    ]
}

/// Registry of mocks: data models `mock` and `broken`, similarity
/// `mocksim`, recommenders `mockrec` and `failing`, evaluator `mockeval`,
/// filter `mockfilter`
pub fn mock_registry(recorder: &Recorder, items: Vec<RecommendedItem>) -> ComponentRegistry {
    let mut registry = ComponentRegistry::new();

    for (identifier, fail_build) in [("mock", false), ("broken", true)] {
        let r = recorder.clone();
        registry.register_data_model(identifier, move |conf| {
            r.constructions.fetch_add(1, Ordering::SeqCst);
            let mode = conf.get(keys::SPLITTER).and_then(|raw| raw.parse().ok());
            Ok(Box::new(MockDataModel {
                recorder: r.clone(),
                mode,
                fail_build,
                train: RatingIndex::new(),
                test: RatingIndex::new(),
            }))
        });
    }

    let r = recorder.clone();
    registry.register_similarity("mocksim", move |conf| {
        Ok(Box::new(MockSimilarity {
            recorder: r.clone(),
            key: conf.require(keys::SIMILARITY_KEY)?.to_string(),
            matrix: SimilarityMatrix::new(SimilarityKind::Item),
        }))
    });

    for (identifier, fail) in [("mockrec", false), ("failing", true)] {
        let r = recorder.clone();
        let items = items.clone();
        registry.register_recommender(identifier, move |_conf| {
            Ok(Box::new(MockRecommender {
                recorder: r.clone(),
                items: items.clone(),
                fail,
                recommended: Vec::new(),
                eval_context: None,
            }))
        });
    }

    let r = recorder.clone();
    registry.register_evaluator("mockeval", move || {
        Ok(Box::new(MockEvaluator {
            recorder: r.clone(),
        }))
    });

    let r = recorder.clone();
    registry.register_filter("mockfilter", move || {
        Ok(Box::new(MockFilter {
            recorder: r.clone(),
        }))
    });

    registry
}

/// Minimal configuration for the mock registry writing under `result_dir`
pub fn base_conf(result_dir: &Path, split_mode: &str) -> Configuration {
    let mut conf = Configuration::new();
    conf.set(keys::DATA_MODEL_FORMAT, "mock");
    conf.set(keys::SPLITTER, split_mode);
    conf.set(keys::RECOMMENDER_CLASS, "mockrec");
    conf.set(keys::RESULT_DIR, result_dir.display());
    conf.set(keys::INPUT_PATH, "ratings");
    conf
}
