//! The data model capability consumed by the job runner.

use crate::random::RandomSource;
use crate::splitter::SplitMode;
use crate::types::RatingIndex;
use conf::Configuration;

/// A dataset plus its current train/test split.
///
/// A job constructs one data model and calls
/// [`build_data_model`](DataModel::build_data_model) once per fold; the
/// implementation decides how much work a rebuild takes.
pub trait DataModel: Send {
    /// (Re)derive the train/test split for the fold described by `conf`.
    ///
    /// `conf` is the per-fold configuration, so
    /// [`Configuration::fold_index`] is set under cross validation.
    fn build_data_model(
        &mut self,
        conf: &Configuration,
        random: &mut RandomSource,
    ) -> anyhow::Result<()>;

    /// The active split mode, if the model splits at all
    fn split_mode(&self) -> Option<SplitMode>;

    fn train_set(&self) -> &RatingIndex;

    fn test_set(&self) -> &RatingIndex;
}
