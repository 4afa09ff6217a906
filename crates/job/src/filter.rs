//! Optional post-processing of the recommendation list.

use crate::error::{JobError, Result};
use crate::registry::ComponentRegistry;
use components::RecommendedFilter;
use components::RecommendedItem;
use conf::{keys, Configuration};
use tracing::debug;

/// Runs the filter named by `rec.filter.class`, or passes `items` through
/// untouched when none is configured.
pub fn apply_filter(
    registry: &ComponentRegistry,
    conf: &Configuration,
    items: Vec<RecommendedItem>,
) -> Result<Vec<RecommendedItem>> {
    let Some(identifier) = conf.get_non_empty(keys::FILTER_CLASS) else {
        return Ok(items);
    };

    let filter: Box<dyn RecommendedFilter> = registry.create_filter(identifier)?;
    let before = items.len();
    let filtered = filter.filter(items).map_err(|reason| JobError::Domain {
        stage: "filter",
        reason,
    })?;
    debug!(
        "Filter {} kept {} of {} recommendations",
        filter.name(),
        filtered.len(),
        before
    );
    Ok(filtered)
}
