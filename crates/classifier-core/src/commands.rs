use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use inference::lightcurve::{self, LightCurveRequest, LightCurveResponse};
use inference::{
    ClassificationService, ErrorKind, InferenceError, TabularRequest, TabularResponse,
    ValidationError, VectorRequest,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Body printed for any failed command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct ErrorBody {
    pub error: String,
    pub kind: &'static str,
}

impl From<&InferenceError> for ErrorBody {
    fn from(err: &InferenceError) -> Self {
        Self {
            error: err.public_message(),
            kind: err.kind().as_str(),
        }
    }
}

impl From<ValidationError> for ErrorBody {
    fn from(err: ValidationError) -> Self {
        Self::from(&InferenceError::from(err))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct ArtifactStatus {
    pub status: &'static str,
    pub version_tag: String,
    pub model_id: String,
    pub model_version: String,
}

pub(crate) fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed reading request {}", path.display())),
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("failed reading request from stdin")?;
            Ok(raw)
        }
    }
}

pub(crate) fn predict(
    service: &ClassificationService,
    raw: &str,
) -> Result<TabularResponse, ErrorBody> {
    let request: TabularRequest = decode(raw)?;
    service.predict(&request).map_err(|err| ErrorBody::from(&err))
}

pub(crate) fn predict_vector(
    service: &ClassificationService,
    raw: &str,
) -> Result<TabularResponse, ErrorBody> {
    let request: VectorRequest = decode(raw)?;
    service
        .predict_vector(&request)
        .map_err(|err| ErrorBody::from(&err))
}

pub(crate) fn analyze_lightcurve(raw: &str) -> Result<LightCurveResponse, ErrorBody> {
    let request: LightCurveRequest = decode(raw)?;
    lightcurve::analyze(&request).map_err(ErrorBody::from)
}

pub(crate) fn check_artifacts(service: &ClassificationService) -> Result<ArtifactStatus, ErrorBody> {
    let artifacts = service.warm_up().map_err(|err| ErrorBody::from(&err))?;
    Ok(ArtifactStatus {
        status: "ok",
        version_tag: artifacts.version_tag.clone(),
        model_id: artifacts.classifier.model_id().to_string(),
        model_version: artifacts.classifier.model_version().to_string(),
    })
}

/// Request bodies that fail to decode are caller errors, reported like any other validation failure.
fn decode<T: DeserializeOwned>(raw: &str) -> Result<T, ErrorBody> {
    serde_json::from_str(raw).map_err(|err| ErrorBody {
        error: format!("invalid request: {err}"),
        kind: ErrorKind::Validation.as_str(),
    })
}
