//! Preprocessing and model artifacts.
//!
//! Three JSON files exported by the training pipeline live together in one
//! versioned directory:
//!
//! ```text
//! artifacts/tabular-v1/
//!   numeric_imputer.json   per-feature fill values
//!   numeric_scaler.json    per-feature mean / scale
//!   rf_baseline.json       positive-class ("confirmed") classifier
//! ```
//!
//! The directory name is the version tag. An [`ArtifactStore`] loads the set
//! once and hands out a shared, immutable [`ArtifactSet`].

mod loader;
mod model;
mod store;

use std::path::PathBuf;

pub use loader::{ArtifactLoader, JsonArtifactLoader};
pub use model::{
    Classifier, DecisionTree, ImputeStrategy, Imputer, LogisticModel, RandomForest, Scaler,
    TreeNode,
};
pub use store::{ArtifactSet, ArtifactStore};

pub const IMPUTER_FILE: &str = "numeric_imputer.json";
pub const SCALER_FILE: &str = "numeric_scaler.json";
pub const CLASSIFIER_FILE: &str = "rf_baseline.json";

/// Artifact directory shipped with the repository.
const DEFAULT_ARTIFACT_DIR: &str = "artifacts/tabular-v1";

/// Repository-anchored default artifact root (`<workspace>/artifacts/tabular-v1`).
pub fn default_artifacts_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let workspace_root = manifest_dir
        .parent()
        .and_then(|crates| crates.parent())
        .map(PathBuf::from)
        .unwrap_or(manifest_dir);
    workspace_root.join(DEFAULT_ARTIFACT_DIR)
}

#[cfg(test)]
mod tests;
