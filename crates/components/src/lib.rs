//! Pluggable recommender components.
//!
//! This crate provides:
//! - Capability traits the job drives: `Similarity`, `Recommender`,
//!   `Evaluator`, `RecommendedFilter`
//! - `RecommenderContext`, the per-fold bundle of configuration, data model
//!   and similarities
//! - Built-in implementations so a job can run without user code
//!
//! ## Built-ins
//! - Similarities: cosine and Jaccard over user or item rating vectors
//! - Recommenders: most-popular and item-KNN
//! - Evaluators: precision, recall and NDCG at top-N
//! - Filters: positive-score and unique-item

pub mod context;
pub mod evaluation;
pub mod filters;
pub mod recommenders;
pub mod similarity;
pub mod traits;
pub mod types;

// Re-export main types
pub use context::RecommenderContext;
pub use evaluation::{EvalContext, NdcgEvaluator, PrecisionEvaluator, RecallEvaluator};
pub use similarity::{RatingSimilarity, SimilarityKind, SimilarityMatrix};
pub use traits::{Evaluator, RecommendedFilter, Recommender, Similarity};
pub use types::{MeasureValue, RecommendedItem};
