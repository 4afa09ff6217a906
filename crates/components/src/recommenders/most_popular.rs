//! Recommends the most-rated training items each user has not seen.

use crate::context::RecommenderContext;
use crate::evaluation::EvalContext;
use crate::recommenders::{rank_for_test_users, top_n_from_conf};
use crate::traits::Recommender;
use crate::types::RecommendedItem;
use anyhow::Result;
use conf::Configuration;
use tracing::{debug, instrument};

pub struct MostPopularRecommender {
    top_n: usize,
    recommended: Vec<RecommendedItem>,
    eval_context: Option<EvalContext>,
}

impl MostPopularRecommender {
    pub fn new(conf: &Configuration) -> Result<Self> {
        Ok(Self {
            top_n: top_n_from_conf(conf)?,
            recommended: Vec::new(),
            eval_context: None,
        })
    }
}

impl Recommender for MostPopularRecommender {
    fn name(&self) -> &str {
        "MostPopular"
    }

    #[instrument(skip_all)]
    fn recommend(&mut self, context: &RecommenderContext<'_>) -> Result<()> {
        let data_model = context.data_model();
        let train = data_model.train_set();
        let test = data_model.test_set();

        let popularity = train.item_popularity();
        // enough candidates to fill top-N after removing a user's history
        let recommended = rank_for_test_users(train, test, self.top_n, |_, seen| {
            popularity
                .iter()
                .filter(|(item, _)| !seen.contains(item))
                .take(self.top_n)
                .map(|(item, count)| (item.to_string(), *count as f64))
                .collect()
        });

        debug!("MostPopular produced {} recommendations", recommended.len());
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
