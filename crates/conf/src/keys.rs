//! Well-known configuration keys.
//!
//! Components may read any key they like; these are the ones the job
//! runner and the built-in components agree on.

// Component identifiers
pub const DATA_MODEL_FORMAT: &str = "data.model.format";
pub const RECOMMENDER_CLASS: &str = "rec.recommender.class";
pub const SIMILARITY_CLASS: &str = "rec.similarity.class";
pub const RECOMMENDER_SIMILARITIES: &str = "rec.recommender.similarities";
pub const SIMILARITY_KEY: &str = "rec.recommender.similarity.key";
pub const EVAL_CLASS: &str = "rec.eval.class";
pub const FILTER_CLASS: &str = "rec.filter.class";

// Evaluation
pub const EVAL_ENABLE: &str = "rec.eval.enable";
pub const RANKING_TOP_N: &str = "rec.recommender.ranking.topn";
pub const NEIGHBORS_KNN: &str = "rec.neighbors.knn.number";

// Splitting
pub const SPLITTER: &str = "data.model.splitter";
pub const CV_NUMBER: &str = "data.splitter.cv.number";
pub const CV_INDEX: &str = "data.splitter.cv.index";
pub const TRAINSET_RATIO: &str = "data.splitter.trainset.ratio";
pub const RANDOM_UNIFORM: &str = "data.splitter.random.uniform";
pub const RANDOM_SEED: &str = "rec.random.seed";

// Input
pub const DATA_DIR: &str = "dfs.data.dir";
pub const INPUT_PATH: &str = "data.input.path";
pub const TESTSET_PATH: &str = "data.testset.path";
pub const CONVERT_SEP: &str = "data.convert.sep";

// Output
pub const RESULT_DIR: &str = "dfs.result.dir";
pub const OUTPUT_STRICT: &str = "rec.output.strict";

/// Set by the job at construction; informational only.
pub const JOB_ID: &str = "rec.job.id";
