use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::artifacts::{
    ArtifactLoader, ArtifactSet, Classifier, DecisionTree, ImputeStrategy, Imputer,
    JsonArtifactLoader, LogisticModel, RandomForest, Scaler, TreeNode, CLASSIFIER_FILE,
    IMPUTER_FILE, SCALER_FILE,
};
use crate::errors::ArtifactError;
use crate::types::FEATURE_ORDER;

pub(crate) const TEST_VERSION_DIR: &str = "tabular-test";

fn names() -> Vec<String> {
    FEATURE_ORDER.iter().map(|s| s.to_string()).collect()
}

pub(crate) fn median_imputer() -> Imputer {
    Imputer {
        strategy: ImputeStrategy::Median,
        feature_names: names(),
        statistics: vec![9.75, 420.0, 2.39, 1.0, 24.6],
    }
}

/// Mean 0 / scale 1: scaled values equal imputed values.
pub(crate) fn identity_scaler() -> Scaler {
    Scaler {
        feature_names: names(),
        mean: vec![0.0; 5],
        scale: vec![1.0; 5],
    }
}

pub(crate) fn logistic(weights: [f64; 5], bias: f64) -> Classifier {
    Classifier::Logistic(LogisticModel {
        model_id: "logit-test".to_string(),
        model_version: "tabular-v1.0".to_string(),
        weights: weights.to_vec(),
        bias,
        feature_names: names(),
        cross_mission_auc: None,
    })
}

/// Two stumps over `snr` (slot 4) and `transit_depth_ppm` (slot 1).
pub(crate) fn two_stump_forest() -> Classifier {
    Classifier::RandomForest(RandomForest {
        model_id: "rf-test".to_string(),
        model_version: "tabular-v1.0".to_string(),
        feature_names: names(),
        feature_importances: vec![0.1, 0.4, 0.1, 0.1, 0.3],
        trees: vec![
            DecisionTree {
                nodes: vec![
                    TreeNode::Split {
                        feature: 4,
                        threshold: 10.0,
                        left: 1,
                        right: 2,
                    },
                    TreeNode::Leaf { value: [8.0, 2.0] },
                    TreeNode::Leaf { value: [1.0, 9.0] },
                ],
            },
            DecisionTree {
                nodes: vec![
                    TreeNode::Split {
                        feature: 1,
                        threshold: 500.0,
                        left: 1,
                        right: 2,
                    },
                    TreeNode::Leaf { value: [6.0, 4.0] },
                    TreeNode::Leaf { value: [3.0, 7.0] },
                ],
            },
        ],
        cross_mission_auc: Some(0.88),
    })
}

pub(crate) fn write_json<T: serde::Serialize>(dir: &Path, file: &str, value: &T) {
    let body = serde_json::to_string_pretty(value).expect("serialize artifact");
    std::fs::write(dir.join(file), body).expect("write artifact");
}

/// Writes a complete artifact set into `<tmp>/tabular-test` and returns that root.
pub(crate) fn artifact_dir(classifier: &Classifier) -> (tempfile::TempDir, PathBuf) {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let root = tmp.path().join(TEST_VERSION_DIR);
    std::fs::create_dir_all(&root).expect("create artifact root");
    write_json(&root, IMPUTER_FILE, &median_imputer());
    write_json(&root, SCALER_FILE, &identity_scaler());
    write_json(&root, CLASSIFIER_FILE, classifier);
    (tmp, root)
}

/// Delegates to the JSON loader and counts invocations.
#[derive(Clone, Default)]
pub(crate) struct CountingLoader {
    pub(crate) calls: Arc<AtomicUsize>,
    pub(crate) delay: Option<std::time::Duration>,
}

impl CountingLoader {
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ArtifactLoader for CountingLoader {
    fn load(&self, root: &Path) -> Result<ArtifactSet, ArtifactError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        JsonArtifactLoader.load(root)
    }
}
