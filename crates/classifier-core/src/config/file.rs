use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::paths::resolve_config_path;
use super::types::ServiceConfig;
use super::util::non_empty;

impl ServiceConfig {
    pub(super) fn apply_file_config(&mut self) -> Result<bool> {
        let Some(path) = resolve_config_path()? else {
            return Ok(false);
        };

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("failed reading config file {}", path.display()))?;
        let file_cfg: FileConfig = toml::from_str(&raw)
            .with_context(|| format!("failed parsing TOML config {}", path.display()))?;

        self.apply_file_artifacts(file_cfg.artifacts);
        self.apply_file_version(file_cfg.version);
        self.apply_file_explanation(file_cfg.explanation);
        self.apply_file_features(file_cfg.features);

        Ok(true)
    }

    fn apply_file_artifacts(&mut self, artifacts: Option<FileArtifactsConfig>) {
        let Some(artifacts) = artifacts else {
            return;
        };
        if let Some(v) = non_empty(artifacts.dir) {
            self.artifacts_dir = PathBuf::from(v);
        }
        if let Some(v) = artifacts.warm {
            self.warm_artifacts = v;
        }
    }

    fn apply_file_version(&mut self, version: Option<FileVersionConfig>) {
        let Some(version) = version else {
            return;
        };
        if let Some(v) = non_empty(version.model) {
            self.model_version = v;
        }
        if let Some(v) = non_empty(version.imputer) {
            self.imputer_id = v;
        }
        if let Some(v) = non_empty(version.scaler) {
            self.scaler_id = v;
        }
        if let Some(v) = non_empty(version.calibrator) {
            self.calibrator_id = v;
        }
    }

    fn apply_file_explanation(&mut self, explanation: Option<FileExplanationConfig>) {
        let Some(explanation) = explanation else {
            return;
        };
        if let Some(v) = explanation.top_k {
            self.explanation_top_k = v.max(1);
        }
    }

    fn apply_file_features(&mut self, features: Option<FileFeaturesConfig>) {
        let Some(features) = features else {
            return;
        };
        if let Some(required) = features.required {
            self.required_features = required
                .into_iter()
                .filter_map(|name| non_empty(Some(name)))
                .collect();
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
struct FileConfig {
    #[serde(default)]
    artifacts: Option<FileArtifactsConfig>,
    #[serde(default)]
    version: Option<FileVersionConfig>,
    #[serde(default)]
    explanation: Option<FileExplanationConfig>,
    #[serde(default)]
    features: Option<FileFeaturesConfig>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct FileArtifactsConfig {
    #[serde(default)]
    dir: Option<String>,
    #[serde(default)]
    warm: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct FileVersionConfig {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    imputer: Option<String>,
    #[serde(default)]
    scaler: Option<String>,
    #[serde(default)]
    calibrator: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct FileExplanationConfig {
    #[serde(default)]
    top_k: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct FileFeaturesConfig {
    #[serde(default)]
    required: Option<Vec<String>>,
}
