use std::path::PathBuf;

use inference::{ServiceOptions, VersionInfo};

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub artifacts_dir: PathBuf,
    /// Load the artifact set before serving the first request.
    pub warm_artifacts: bool,
    pub model_version: String,
    pub imputer_id: String,
    pub scaler_id: String,
    pub calibrator_id: String,
    pub explanation_top_k: usize,
    pub required_features: Vec<String>,
}

impl ServiceConfig {
    pub fn service_options(&self) -> ServiceOptions {
        ServiceOptions {
            required_features: self.required_features.clone(),
            top_k: self.explanation_top_k,
            versions: VersionInfo {
                model: self.model_version.clone(),
                imputer: self.imputer_id.clone(),
                scaler: self.scaler_id.clone(),
                calibrator: self.calibrator_id.clone(),
            },
        }
    }
}
