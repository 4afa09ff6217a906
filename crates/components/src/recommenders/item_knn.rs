//! Item-based collaborative filtering.
//!
//! "Items similar to what you rated": every item a user rated in training
//! votes for its nearest neighbours, weighted by similarity.
//!
//! ## Algorithm
//! 1. Pick the `item` similarity from the context, else the primary one
//! 2. For each item the user rated, walk its neighbour row
//! 3. Sum similarities per unseen candidate
//! 4. Keep the top N

use crate::context::RecommenderContext;
use crate::evaluation::EvalContext;
use crate::recommenders::{rank_for_test_users, top_n_from_conf};
use crate::similarity::SimilarityKind;
use crate::traits::{Recommender, Similarity};
use crate::types::RecommendedItem;
use anyhow::{Result, bail};
use conf::Configuration;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

pub struct ItemKnnRecommender {
    top_n: usize,
    recommended: Vec<RecommendedItem>,
    eval_context: Option<EvalContext>,
}

impl ItemKnnRecommender {
    pub fn new(conf: &Configuration) -> Result<Self> {
        Ok(Self {
            top_n: top_n_from_conf(conf)?,
            recommended: Vec::new(),
            eval_context: None,
        })
    }

    fn item_similarity<'c>(context: &'c RecommenderContext<'_>) -> Result<&'c Arc<dyn Similarity>> {
        let similarity = match context.get_similarity("item").or(context.similarity()) {
            Some(similarity) => similarity,
            None => bail!("ItemKNN needs a similarity; set rec.recommender.similarities=item"),
        };
        if similarity.matrix().kind() != SimilarityKind::Item {
            bail!(
                "ItemKNN needs an item similarity, got a {} similarity",
                similarity.matrix().kind()
            );
        }
        Ok(similarity)
    }
}

impl Recommender for ItemKnnRecommender {
    fn name(&self) -> &str {
        "ItemKNN"
    }

    #[instrument(skip_all)]
    fn recommend(&mut self, context: &RecommenderContext<'_>) -> Result<()> {
        let matrix = Self::item_similarity(context)?.matrix();
        let data_model = context.data_model();
        let train = data_model.train_set();
        let test = data_model.test_set();

        let recommended = rank_for_test_users(train, test, self.top_n, |_, seen| {
            let mut scores: HashMap<&str, f64> = HashMap::new();
            for &rated in seen {
                for neighbor in matrix.neighbors(rated) {
                    *scores.entry(neighbor.id.as_str()).or_insert(0.0) += neighbor.similarity;
                }
            }
            scores
                .into_iter()
                .map(|(item, score)| (item.to_string(), score))
                .collect()
        });

        debug!("ItemKNN produced {} recommendations", recommended.len());
        self.eval_context = Some(EvalContext::new(test, &recommended, self.top_n));
        self.recommended = recommended;
        Ok(())
    }

    fn recommended_list(&self) -> &[RecommendedItem] {
        &self.recommended
    }

    fn eval_context(&self) -> Option<&EvalContext> {
        self.eval_context.as_ref()
    }
}
