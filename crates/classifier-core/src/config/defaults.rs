use inference::{default_artifacts_root, VersionInfo, DEFAULT_REQUIRED_FEATURES, DEFAULT_TOP_K};

use super::types::ServiceConfig;

impl Default for ServiceConfig {
    fn default() -> Self {
        let versions = VersionInfo::default();
        Self {
            artifacts_dir: default_artifacts_root(),
            warm_artifacts: true,
            model_version: versions.model,
            imputer_id: versions.imputer,
            scaler_id: versions.scaler,
            calibrator_id: versions.calibrator,
            explanation_top_k: DEFAULT_TOP_K,
            required_features: DEFAULT_REQUIRED_FEATURES
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }
}
