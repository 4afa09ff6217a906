//! Data model backed by delimited rating files.

use crate::error::{DataModelError, Result};
use crate::model::DataModel;
use crate::parser::{self, Separators};
use crate::random::RandomSource;
use crate::splitter::{DataSplitter, SplitMode};
use crate::types::{Rating, RatingIndex};
use conf::{keys, Configuration};
use std::path::{Path, PathBuf};
use tracing::info;

/// Reads `data.input.path` once and re-splits it on every build.
pub struct TextDataModel {
    input_path: PathBuf,
    testset_path: Option<PathBuf>,
    separators: Separators,
    splitter: DataSplitter,
    ratings: Option<Vec<Rating>>,
    given_test: Option<Vec<Rating>>,
    train: RatingIndex,
    test: RatingIndex,
}

impl TextDataModel {
    pub fn new(conf: &Configuration) -> Result<Self> {
        let mode: SplitMode = conf.require(keys::SPLITTER)?.parse()?;
        let input_path = resolve_path(conf, conf.require(keys::INPUT_PATH)?);
        let testset_path = conf
            .get_non_empty(keys::TESTSET_PATH)
            .map(|raw| resolve_path(conf, raw));
        if mode == SplitMode::Given && testset_path.is_none() {
            return Err(DataModelError::InvalidSplit(format!(
                "given split requires {}",
                keys::TESTSET_PATH
            )));
        }

        let folds = conf.get_int_or(keys::CV_NUMBER, 1)?;
        let folds = u32::try_from(folds).map_err(|_| DataModelError::InvalidValue {
            field: keys::CV_NUMBER.to_string(),
            value: folds.to_string(),
        })?;
        let splitter = DataSplitter::new(mode)
            .with_train_ratio(conf.get_float_or(keys::TRAINSET_RATIO, 0.8)?)
            .with_folds(folds);

        Ok(Self {
            input_path,
            testset_path,
            separators: Separators::parse(conf.get_or(keys::CONVERT_SEP, ",")),
            splitter,
            ratings: None,
            given_test: None,
            train: RatingIndex::new(),
            test: RatingIndex::new(),
        })
    }

    /// Parses the input (and given test) files the first time through
    fn load(&mut self) -> Result<()> {
        if self.ratings.is_some() {
            return Ok(());
        }
        info!("Loading ratings from {}", self.input_path.display());

        let (ratings, given_test) = rayon::join(
            || parser::parse_ratings(&self.input_path, &self.separators),
            || {
                self.testset_path
                    .as_deref()
                    .map(|path| parser::parse_ratings(path, &self.separators))
                    .transpose()
            },
        );
        self.ratings = Some(ratings?);
        self.given_test = given_test?;
        Ok(())
    }

    fn rebuild(&mut self, conf: &Configuration, random: &mut RandomSource) -> Result<()> {
        self.load()?;
        let fold = conf.fold_index()?;
        let ratings = self.ratings.as_deref().unwrap_or(&[]);
        let split = self
            .splitter
            .split(ratings, self.given_test.as_deref(), fold, random)?;

        let (train_users, train_items, train_ratings) = split.train.counts();
        info!(
            "Split {} (fold {:?}): train {} ratings / {} users / {} items, test {} ratings",
            self.splitter.mode(),
            fold,
            train_ratings,
            train_users,
            train_items,
            split.test.counts().2
        );
        self.train = split.train;
        self.test = split.test;
        Ok(())
    }
}

fn resolve_path(conf: &Configuration, raw: &str) -> PathBuf {
    match conf.get_non_empty(keys::DATA_DIR) {
        Some(dir) => Path::new(dir).join(raw),
        None => PathBuf::from(raw),
    }
}

impl DataModel for TextDataModel {
    fn build_data_model(
        &mut self,
        conf: &Configuration,
        random: &mut RandomSource,
    ) -> anyhow::Result<()> {
        self.rebuild(conf, random)?;
        Ok(())
    }

    fn split_mode(&self) -> Option<SplitMode> {
        Some(self.splitter.mode())
    }

    fn train_set(&self) -> &RatingIndex {
        &self.train
    }

    fn test_set(&self) -> &RatingIndex {
        &self.test
    }
}
