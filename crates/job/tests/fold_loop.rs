//! Fold scheduling, data model reuse and per-fold configuration.

mod common;

use common::{base_conf, mock_registry, sample_items, Recorder};
use conf::keys;
use job::{Capability, JobError, PersistOutcome, RecommenderJob};
use std::fs;

#[test]
fn test_kfold_runs_every_fold_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let recorder = Recorder::default();
    let mut conf = base_conf(dir.path(), "kcv");
    conf.set(keys::CV_NUMBER, 3);

    let mut job = RecommenderJob::new(conf, mock_registry(&recorder, sample_items())).unwrap();
    let report = job.run_job().unwrap();

    let folds: Vec<Option<u32>> = report.folds.iter().map(|f| f.fold_index).collect();
    assert_eq!(folds, vec![Some(1), Some(2), Some(3)]);
    assert_eq!(
        recorder.matching("build"),
        vec!["build fold=Some(1)", "build fold=Some(2)", "build fold=Some(3)"]
    );

    let output_dir = dir.path().join("ratings-Mock-output");
    for fold in 1..=3 {
        assert!(output_dir.join(format!("Mock-{}", fold)).is_file());
    }
}

#[test]
fn test_data_model_constructed_once() {
    let dir = tempfile::tempdir().unwrap();
    let recorder = Recorder::default();
    let mut conf = base_conf(dir.path(), "kcv");
    conf.set(keys::CV_NUMBER, 4);

    let mut job = RecommenderJob::new(conf, mock_registry(&recorder, sample_items())).unwrap();
    job.run_job().unwrap();

    assert_eq!(recorder.constructions(), 1);
    assert_eq!(recorder.matching("build").len(), 4);
}

#[test]
fn test_leave_one_out_folds_start_at_zero() {
    let dir = tempfile::tempdir().unwrap();
    let recorder = Recorder::default();
    let mut conf = base_conf(dir.path(), "loocv");
    conf.set(keys::CV_NUMBER, 2);

    let mut job = RecommenderJob::new(conf, mock_registry(&recorder, sample_items())).unwrap();
    let report = job.run_job().unwrap();

    let folds: Vec<Option<u32>> = report.folds.iter().map(|f| f.fold_index).collect();
    assert_eq!(folds, vec![Some(0), Some(1)]);
    let output_dir = dir.path().join("ratings-Mock-output");
    assert!(output_dir.join("Mock-0").is_file());
    assert!(output_dir.join("Mock-1").is_file());
    assert!(!output_dir.join("Mock-2").exists());
}

#[test]
fn test_given_and_ratio_run_once_without_suffix() {
    for mode in ["given", "ratio"] {
        let dir = tempfile::tempdir().unwrap();
        let recorder = Recorder::default();
        let mut conf = base_conf(dir.path(), mode);
        conf.set(keys::CV_NUMBER, 5);

        let mut job =
            RecommenderJob::new(conf, mock_registry(&recorder, sample_items())).unwrap();
        let report = job.run_job().unwrap();

        assert_eq!(report.folds.len(), 1, "mode {}", mode);
        assert_eq!(report.folds[0].fold_index, None);
        assert_eq!(recorder.matching("build"), vec!["build fold=None"]);

        let expected = dir.path().join("ratings-Mock-output/Mock");
        assert_eq!(report.folds[0].persist, PersistOutcome::Written(expected.clone()));
        assert!(expected.is_file());
    }
}

#[test]
fn test_unknown_split_mode_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let recorder = Recorder::default();
    let conf = base_conf(dir.path(), "bootstrap");

    let mut job = RecommenderJob::new(conf, mock_registry(&recorder, sample_items())).unwrap();
    let err = job.run_job().unwrap_err();

    assert!(matches!(err, JobError::UnknownSplitMode(ref mode) if mode == "bootstrap"));
    assert!(recorder.events().is_empty());
}

#[test]
fn test_fold_index_does_not_leak_into_job_conf() {
    let dir = tempfile::tempdir().unwrap();
    let recorder = Recorder::default();
    let mut conf = base_conf(dir.path(), "kcv");
    conf.set(keys::CV_NUMBER, 2);

    let mut job = RecommenderJob::new(conf, mock_registry(&recorder, sample_items())).unwrap();
    job.run_job().unwrap();

    assert!(!job.conf().contains(keys::CV_INDEX));
    assert_eq!(
        recorder.matching("recommend"),
        vec![
            "recommend fold=Some(1) similarities=0 primary=None",
            "recommend fold=Some(2) similarities=0 primary=None",
        ]
    );
}

#[test]
fn test_fold_failure_stops_the_job() {
    let dir = tempfile::tempdir().unwrap();
    let recorder = Recorder::default();
    let mut conf = base_conf(dir.path(), "kcv");
    conf.set(keys::CV_NUMBER, 3);
    conf.set(keys::RECOMMENDER_CLASS, "failing");

    let mut job = RecommenderJob::new(conf, mock_registry(&recorder, sample_items())).unwrap();
    let err = job.run_job().unwrap_err();

    assert!(matches!(err, JobError::Domain { stage: "recommend", .. }));
    assert_eq!(recorder.matching("build").len(), 1);
    assert!(!dir.path().join("ratings-Mock-output").exists());
}

#[test]
fn test_data_model_build_failure() {
    let dir = tempfile::tempdir().unwrap();
    let recorder = Recorder::default();
    let mut conf = base_conf(dir.path(), "ratio");
    conf.set(keys::DATA_MODEL_FORMAT, "broken");

    let mut job = RecommenderJob::new(conf, mock_registry(&recorder, sample_items())).unwrap();
    let err = job.run_job().unwrap_err();

    match err {
        JobError::Build { stage, reason } => {
            assert_eq!(stage, "data model");
            assert!(reason.to_string().contains("unreadable"));
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(recorder.matching("recommend").is_empty());
}

#[test]
fn test_unregistered_components_are_fatal() {
    let dir = tempfile::tempdir().unwrap();

    let mut conf = base_conf(dir.path(), "ratio");
    conf.set(keys::DATA_MODEL_FORMAT, "arff");
    let mut job = RecommenderJob::new(conf, mock_registry(&Recorder::default(), sample_items()))
        .unwrap();
    assert!(matches!(
        job.run_job().unwrap_err(),
        JobError::ComponentNotFound {
            capability: Capability::DataModel,
            ..
        }
    ));

    let mut conf = base_conf(dir.path(), "ratio");
    conf.set(keys::RECOMMENDER_CLASS, "svd");
    let mut job = RecommenderJob::new(conf, mock_registry(&Recorder::default(), sample_items()))
        .unwrap();
    assert!(matches!(
        job.run_job().unwrap_err(),
        JobError::ComponentNotFound {
            capability: Capability::Recommender,
            ..
        }
    ));
}

#[test]
fn test_set_recommender_overrides_conf() {
    let dir = tempfile::tempdir().unwrap();
    let recorder = Recorder::default();
    let mut conf = base_conf(dir.path(), "ratio");
    conf.set(keys::RECOMMENDER_CLASS, "failing");

    let mut job = RecommenderJob::new(conf, mock_registry(&recorder, sample_items())).unwrap();
    job.set_recommender("mockrec");
    let report = job.run_job().unwrap();

    assert_eq!(report.folds[0].recommender, "Mock");
    assert_eq!(job.conf().get(keys::RECOMMENDER_CLASS), Some("mockrec"));
}

#[test]
fn test_each_job_gets_a_fresh_id() {
    let dir = tempfile::tempdir().unwrap();
    let recorder = Recorder::default();
    let first = RecommenderJob::new(
        base_conf(dir.path(), "ratio"),
        mock_registry(&recorder, sample_items()),
    )
    .unwrap();
    let second = RecommenderJob::new(
        base_conf(dir.path(), "ratio"),
        mock_registry(&recorder, sample_items()),
    )
    .unwrap();

    assert!(uuid::Uuid::parse_str(first.job_id()).is_ok());
    assert_ne!(first.job_id(), second.job_id());
    assert_eq!(first.conf().get(keys::JOB_ID), Some(first.job_id()));
}

#[test]
fn test_results_file_content() {
    let dir = tempfile::tempdir().unwrap();
    let recorder = Recorder::default();
    let conf = base_conf(dir.path(), "given");

    let mut job = RecommenderJob::new(conf, mock_registry(&recorder, sample_items())).unwrap();
    job.run_job().unwrap();

    let content = fs::read_to_string(dir.path().join("ratings-Mock-output/Mock")).unwrap();
    assert_eq!(content, "u1,c,0.9\nu1,d,0.5\nu2,a,1.0\n");
}
