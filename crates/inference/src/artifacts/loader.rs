use std::io::ErrorKind as IoErrorKind;
use std::path::Path;

use serde::de::DeserializeOwned;

use super::model::{Classifier, Imputer, Scaler};
use super::store::ArtifactSet;
use super::{CLASSIFIER_FILE, IMPUTER_FILE, SCALER_FILE};
use crate::errors::ArtifactError;

/// Builds an [`ArtifactSet`] from an artifact root. Called at most once per store lifetime.
pub trait ArtifactLoader: Send + Sync {
    fn load(&self, root: &Path) -> Result<ArtifactSet, ArtifactError>;
}

/// Reads the three JSON artifact files written by the training export.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonArtifactLoader;

impl ArtifactLoader for JsonArtifactLoader {
    fn load(&self, root: &Path) -> Result<ArtifactSet, ArtifactError> {
        let imputer: Imputer = read_json(root, IMPUTER_FILE)?;
        imputer.validate().map_err(|reason| corrupt(IMPUTER_FILE, reason))?;

        let scaler: Scaler = read_json(root, SCALER_FILE)?;
        scaler.validate().map_err(|reason| corrupt(SCALER_FILE, reason))?;

        let classifier: Classifier = read_json(root, CLASSIFIER_FILE)?;
        classifier
            .validate()
            .map_err(|reason| corrupt(CLASSIFIER_FILE, reason))?;

        Ok(ArtifactSet {
            imputer,
            scaler,
            classifier,
            version_tag: version_tag(root),
        })
    }
}

fn read_json<T: DeserializeOwned>(root: &Path, file: &str) -> Result<T, ArtifactError> {
    let path = root.join(file);
    let raw = std::fs::read_to_string(&path).map_err(|err| match err.kind() {
        IoErrorKind::NotFound => ArtifactError::Missing {
            file: file.to_string(),
        },
        _ => ArtifactError::Unreadable {
            file: file.to_string(),
            reason: err.to_string(),
        },
    })?;
    serde_json::from_str(&raw).map_err(|err| corrupt(file, err.to_string()))
}

fn corrupt(file: &str, reason: String) -> ArtifactError {
    ArtifactError::Corrupt {
        file: file.to_string(),
        reason,
    }
}

/// Versioning is by directory: the last path component names the artifact set.
fn version_tag(root: &Path) -> String {
    root.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unversioned".to_string())
}
