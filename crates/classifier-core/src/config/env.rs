use std::path::PathBuf;

use super::types::ServiceConfig;
use super::util::{env_non_empty, env_usize, parse_bool, split_csv};

impl ServiceConfig {
    pub(super) fn apply_env_overrides(&mut self) {
        self.apply_env_artifacts();
        self.apply_env_versions();
        self.apply_env_explanation();
    }

    fn apply_env_artifacts(&mut self) {
        if let Some(v) = env_non_empty("EXO_ARTIFACTS_DIR") {
            self.artifacts_dir = PathBuf::from(v);
        }
        if let Some(v) = env_non_empty("EXO_WARM_ARTIFACTS") {
            self.warm_artifacts = parse_bool(&v);
        }
    }

    fn apply_env_versions(&mut self) {
        if let Some(v) = env_non_empty("EXO_MODEL_VERSION") {
            self.model_version = v;
        }
        if let Some(v) = env_non_empty("EXO_IMPUTER_ID") {
            self.imputer_id = v;
        }
        if let Some(v) = env_non_empty("EXO_SCALER_ID") {
            self.scaler_id = v;
        }
        if let Some(v) = env_non_empty("EXO_CALIBRATOR_ID") {
            self.calibrator_id = v;
        }
    }

    fn apply_env_explanation(&mut self) {
        if let Some(v) = env_usize("EXO_EXPLANATION_TOP_K") {
            self.explanation_top_k = v.max(1);
        }
        if let Some(v) = env_non_empty("EXO_REQUIRED_FEATURES") {
            self.required_features = split_csv(&v);
        }
    }
}
