//! Builds the similarities a fold's context carries.

use crate::error::{Capability, JobError, Result};
use crate::registry::ComponentRegistry;
use components::{RecommenderContext, Similarity};
use conf::{keys, Configuration};
use data_model::DataModel;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Builds one similarity per key in `rec.recommender.similarities`.
///
/// Each key gets its own instance of `rec.similarity.class`, constructed
/// with `rec.recommender.similarity.key` set to that key. The first key
/// becomes the context's primary similarity. Returns how many were built.
///
/// Nothing is built when the key list is empty or no similarity class
/// resolves.
pub fn build_similarities(
    registry: &ComponentRegistry,
    conf: &Configuration,
    data_model: &dyn DataModel,
    context: &mut RecommenderContext<'_>,
) -> Result<usize> {
    let similarity_keys = conf.get_strings(keys::RECOMMENDER_SIMILARITIES);
    if similarity_keys.is_empty() {
        return Ok(0);
    }

    let Some(class) = conf.get_non_empty(keys::SIMILARITY_CLASS) else {
        debug!("No similarity class configured, skipping similarities");
        return Ok(0);
    };
    if !registry.contains(Capability::Similarity, class) {
        warn!("Similarity '{}' is not registered, skipping similarities", class);
        return Ok(0);
    }

    for (position, key) in similarity_keys.iter().enumerate() {
        let mut similarity_conf = conf.clone();
        similarity_conf.set(keys::SIMILARITY_KEY, key);

        let mut similarity = registry.create_similarity(class, &similarity_conf)?;
        similarity
            .build_similarity_matrix(data_model)
            .map_err(|reason| JobError::Build {
                stage: "similarity",
                reason: reason.context(format!("similarity key '{}'", key)),
            })?;
        info!("Built {} similarity for key '{}'", similarity.name(), key);

        let similarity: Arc<dyn Similarity> = Arc::from(similarity);
        if position == 0 {
            context.set_similarity(Arc::clone(&similarity));
        }
        context.add_similarity(key.as_str(), similarity);
    }

    Ok(similarity_keys.len())
}
