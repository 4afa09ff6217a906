//! Filter implementations for recommendation lists.

pub mod positive_score;
pub mod unique_item;

// Re-export for convenience
pub use positive_score::PositiveScoreFilter;
pub use unique_item::UniqueItemFilter;
