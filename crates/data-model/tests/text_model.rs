//! TextDataModel against real files.

use conf::{keys, Configuration};
use data_model::{DataModel, DataModelError, RandomSource, SplitMode, TextDataModel};
use std::fs;
use std::path::Path;

fn write_ratings(dir: &Path, name: &str, users: usize, items: usize) {
    let mut content = String::new();
    for u in 0..users {
        for i in 0..items {
            content.push_str(&format!("u{},i{},{}\n", u, i, 1 + (u + i) % 5));
        }
    }
    fs::write(dir.join(name), content).unwrap();
}

fn base_conf(dir: &Path, splitter: &str) -> Configuration {
    let mut conf = Configuration::with_defaults();
    conf.set(keys::DATA_DIR, dir.display());
    conf.set(keys::INPUT_PATH, "ratings.csv");
    conf.set(keys::SPLITTER, splitter);
    conf
}

#[test]
fn test_ratio_build() {
    let dir = tempfile::tempdir().unwrap();
    write_ratings(dir.path(), "ratings.csv", 10, 10);
    let conf = base_conf(dir.path(), "ratio");

    let mut model = TextDataModel::new(&conf).unwrap();
    let mut random = RandomSource::seeded(42);
    model.build_data_model(&conf, &mut random).unwrap();

    assert_eq!(model.split_mode(), Some(SplitMode::Ratio));
    assert_eq!(model.train_set().counts().2, 80);
    assert_eq!(model.test_set().counts().2, 20);
}

#[test]
fn test_kfold_rebuild_per_fold() {
    let dir = tempfile::tempdir().unwrap();
    write_ratings(dir.path(), "ratings.csv", 6, 5);
    let mut conf = base_conf(dir.path(), "kcv");
    conf.set(keys::CV_NUMBER, 3);

    let mut model = TextDataModel::new(&conf).unwrap();
    let mut random = RandomSource::seeded(1);
    let mut total_test = 0;
    for fold in 1..=3 {
        let mut fold_conf = conf.clone();
        fold_conf.set(keys::CV_INDEX, fold);
        model.build_data_model(&fold_conf, &mut random).unwrap();
        assert_eq!(model.test_set().counts().2, 10);
        total_test += model.test_set().counts().2;
    }
    assert_eq!(total_test, 30);
}

#[test]
fn test_given_split_reads_test_file() {
    let dir = tempfile::tempdir().unwrap();
    write_ratings(dir.path(), "ratings.csv", 4, 4);
    write_ratings(dir.path(), "test.csv", 2, 3);
    let mut conf = base_conf(dir.path(), "given");
    conf.set(keys::TESTSET_PATH, "test.csv");

    let mut model = TextDataModel::new(&conf).unwrap();
    model
        .build_data_model(&conf, &mut RandomSource::seeded(1))
        .unwrap();
    assert_eq!(model.train_set().counts().2, 16);
    assert_eq!(model.test_set().counts().2, 6);
}

#[test]
fn test_given_without_test_path_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let conf = base_conf(dir.path(), "given");
    assert!(matches!(
        TextDataModel::new(&conf),
        Err(DataModelError::InvalidSplit(_))
    ));
}

#[test]
fn test_unknown_split_mode() {
    let dir = tempfile::tempdir().unwrap();
    let conf = base_conf(dir.path(), "holdout");
    assert!(matches!(
        TextDataModel::new(&conf),
        Err(DataModelError::UnknownSplitMode(mode)) if mode == "holdout"
    ));
}

#[test]
fn test_missing_input_fails_on_build() {
    let dir = tempfile::tempdir().unwrap();
    let conf = base_conf(dir.path(), "ratio");
    let mut model = TextDataModel::new(&conf).unwrap();
    let err = model
        .build_data_model(&conf, &mut RandomSource::seeded(1))
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DataModelError>(),
        Some(DataModelError::FileNotFound { .. })
    ));
}
