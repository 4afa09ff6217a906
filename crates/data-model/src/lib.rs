//! # Data Model Crate
//!
//! Rating data for recommender jobs.
//!
//! ## Main Components
//!
//! - **types**: `Rating` and the user/item `RatingIndex`
//! - **parser**: delimited rating files
//! - **splitter**: ratio, k-fold, leave-one-out and given-test splits
//! - **model**: the `DataModel` capability a job builds once per fold
//! - **text**: `TextDataModel`, the file-backed implementation
//! - **random**: the explicit `RandomSource` passed into every build

pub mod error;
pub mod model;
pub mod parser;
pub mod random;
pub mod splitter;
pub mod text;
pub mod types;

pub use error::{DataModelError, Result};
pub use model::DataModel;
pub use random::RandomSource;
pub use splitter::{DataSplitter, SplitMode, SplitResult};
pub use text::TextDataModel;
pub use types::{ItemId, Rating, RatingIndex, UserId};
