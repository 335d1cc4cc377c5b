use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use super::*;
use crate::errors::ArtifactError;
use crate::test_support::{
    artifact_dir, logistic, two_stump_forest, write_json, CountingLoader, TEST_VERSION_DIR,
};
use crate::InferenceError;

#[test]
fn loads_all_three_artifacts_from_versioned_directory() {
    let (_tmp, root) = artifact_dir(&two_stump_forest());
    let store = ArtifactStore::new(&root);

    let set = store.get_artifacts().expect("artifacts load");
    assert_eq!(set.version_tag, TEST_VERSION_DIR);
    assert_eq!(set.imputer.statistics.len(), 5);
    assert_eq!(set.classifier.model_id(), "rf-test");
    assert!(store.is_initialized());
}

#[test]
fn repeated_access_returns_the_same_set() {
    let (_tmp, root) = artifact_dir(&two_stump_forest());
    let store = ArtifactStore::new(&root);

    let first = store.get_artifacts().expect("first load");
    let second = store.get_artifacts().expect("second load");
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn concurrent_first_access_deserializes_exactly_once() {
    const THREADS: usize = 16;

    let (_tmp, root) = artifact_dir(&two_stump_forest());
    let loader = CountingLoader {
        delay: Some(Duration::from_millis(25)),
        ..CountingLoader::default()
    };
    let store = Arc::new(ArtifactStore::with_loader(&root, loader.clone()));
    let barrier = Arc::new(Barrier::new(THREADS));

    let mut workers = Vec::with_capacity(THREADS);
    for _ in 0..THREADS {
        let store = Arc::clone(&store);
        let barrier = Arc::clone(&barrier);
        workers.push(thread::spawn(move || {
            barrier.wait();
            store.get_artifacts().expect("artifacts load")
        }));
    }

    let sets: Vec<_> = workers
        .into_iter()
        .map(|worker| worker.join().expect("worker should join"))
        .collect();

    assert_eq!(loader.calls(), 1);
    for set in &sets[1..] {
        assert!(Arc::ptr_eq(&sets[0], set));
    }
}

#[test]
fn each_missing_file_makes_the_store_unavailable() {
    for file in [IMPUTER_FILE, SCALER_FILE, CLASSIFIER_FILE] {
        let (_tmp, root) = artifact_dir(&two_stump_forest());
        std::fs::remove_file(root.join(file)).expect("remove artifact");

        let store = ArtifactStore::new(&root);
        let err = store.get_artifacts().expect_err("load must fail");
        assert_eq!(
            err,
            ArtifactError::Missing {
                file: file.to_string()
            }
        );
    }
}

#[test]
fn unparsable_file_is_reported_corrupt() {
    let (_tmp, root) = artifact_dir(&two_stump_forest());
    std::fs::write(root.join(SCALER_FILE), "{ not json").expect("overwrite scaler");

    let err = ArtifactStore::new(&root)
        .get_artifacts()
        .expect_err("load must fail");
    assert!(matches!(err, ArtifactError::Corrupt { ref file, .. } if file == SCALER_FILE));
}

#[test]
fn wrong_feature_order_is_reported_corrupt() {
    let (_tmp, root) = artifact_dir(&two_stump_forest());
    let mut imputer = crate::test_support::median_imputer();
    imputer.feature_names.swap(0, 4);
    write_json(&root, IMPUTER_FILE, &imputer);

    let err = ArtifactStore::new(&root)
        .get_artifacts()
        .expect_err("load must fail");
    assert!(matches!(err, ArtifactError::Corrupt { ref file, .. } if file == IMPUTER_FILE));
}

#[test]
fn tree_with_backward_child_is_rejected() {
    let forest = Classifier::RandomForest(RandomForest {
        model_id: "loop".to_string(),
        model_version: "v".to_string(),
        feature_names: Vec::new(),
        feature_importances: vec![0.2; 5],
        trees: vec![DecisionTree {
            nodes: vec![
                TreeNode::Split {
                    feature: 0,
                    threshold: 1.0,
                    left: 0,
                    right: 1,
                },
                TreeNode::Leaf { value: [1.0, 1.0] },
            ],
        }],
        cross_mission_auc: None,
    });
    let (_tmp, root) = artifact_dir(&forest);

    let err = ArtifactStore::new(&root)
        .get_artifacts()
        .expect_err("load must fail");
    assert!(matches!(err, ArtifactError::Corrupt { ref reason, .. } if reason.contains("invalid child")));
}

#[test]
fn failed_load_is_not_retried_until_reset() {
    let (_tmp, root) = artifact_dir(&two_stump_forest());
    let classifier_path = root.join(CLASSIFIER_FILE);
    let saved = std::fs::read_to_string(&classifier_path).expect("read classifier");
    std::fs::remove_file(&classifier_path).expect("remove classifier");

    let loader = CountingLoader::default();
    let mut store = ArtifactStore::with_loader(&root, loader.clone());
    assert!(store.get_artifacts().is_err());

    std::fs::write(&classifier_path, saved).expect("restore classifier");
    assert!(store.get_artifacts().is_err());
    assert_eq!(loader.calls(), 1);

    store.reset();
    assert!(!store.is_initialized());
    store.get_artifacts().expect("reload after reset");
    assert_eq!(loader.calls(), 2);
}

#[test]
fn reset_never_serves_the_previous_set() {
    let (_tmp, root) = artifact_dir(&two_stump_forest());
    let mut store = ArtifactStore::new(&root);
    store.get_artifacts().expect("initial load");

    std::fs::remove_file(root.join(IMPUTER_FILE)).expect("remove imputer");
    store.reset();

    let err = store.get_artifacts().expect_err("stale set must not be served");
    assert!(matches!(err, ArtifactError::Missing { .. }));
}

#[test]
fn unavailable_artifacts_do_not_leak_paths_to_callers() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let store = ArtifactStore::new(tmp.path().join("absent"));
    let err = InferenceError::from(store.get_artifacts().expect_err("missing root"));

    assert_eq!(err.public_message(), "service unavailable");
    assert!(!err.to_string().contains(&tmp.path().display().to_string()));
}

#[test]
fn forest_predicts_mean_positive_fraction() {
    let forest = two_stump_forest();
    // snr > 10 -> 0.9 ; depth <= 500 -> 0.4
    let p = forest
        .predict_positive(&[1.0, 200.0, 1.0, 1.0, 12.0])
        .expect("predict");
    assert!((p - 0.65).abs() < 1e-12);
}

#[test]
fn logistic_attributions_are_weight_times_value() {
    let model = logistic([0.5, -1.0, 0.0, 0.25, 2.0], 0.0);
    let attributions = model.attributions(&[2.0, 1.0, 3.0, 4.0, -0.5]);
    assert_eq!(attributions, [1.0, -1.0, 0.0, 1.0, -1.0]);
}

#[test]
fn importances_are_normalized() {
    let model = logistic([1.0, -1.0, 0.0, 0.0, 2.0], 0.0);
    let importances = model.feature_importances();
    assert!((importances.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    assert!((importances[4] - 0.5).abs() < 1e-12);
}

#[test]
fn scaler_treats_zero_scale_as_unit() {
    let scaler = Scaler {
        feature_names: Vec::new(),
        mean: vec![1.0; 5],
        scale: vec![0.0, 2.0, 1.0, 1.0, 1.0],
    };
    let z = scaler.transform(&[3.0, 5.0, 1.0, 1.0, 1.0]).expect("scale");
    assert_eq!(z, [2.0, 2.0, 0.0, 0.0, 0.0]);
}

#[test]
fn default_root_points_at_repository_artifacts() {
    let root = default_artifacts_root();
    assert!(root.ends_with("artifacts/tabular-v1"));
}
