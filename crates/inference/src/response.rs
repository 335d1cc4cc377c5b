//! Wire types and the final response composition.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{ClassificationResult, Explanation, Label, Mission, NamedFeatures, Probabilities};

/// Opaque request metadata. Carried through, never inspected.
pub type RawRow = serde_json::Map<String, serde_json::Value>;

/// Free-form diagnostics attached to a response.
pub type ValidationReport = BTreeMap<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabularRequest {
    pub mission: Mission,
    pub object_id: String,
    #[serde(default)]
    pub features: NamedFeatures,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_row: Option<RawRow>,
}

/// Pre-normalized input: `[z_period_days, z_transit_depth_ppm, z_planet_radius_re,
/// z_stellar_radius_rs, z_snr, mission_K2, mission_KEPLER, mission_TESS]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRequest {
    pub input_features: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationBlock {
    pub top_shap: Vec<Explanation>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub model: String,
    pub imputer: String,
    pub scaler: String,
    pub calibrator: String,
}

impl Default for VersionInfo {
    fn default() -> Self {
        Self {
            model: "tabular-v1.0".to_string(),
            imputer: "numeric_imputer.json".to_string(),
            scaler: "numeric_scaler.json".to_string(),
            calibrator: "isotonic".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabularResponse {
    pub label: Label,
    pub probabilities: Probabilities,
    pub calibrated_confidence: f64,
    pub reliability_band: String,
    pub explanations: ExplanationBlock,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationReport>,
    pub version: VersionInfo,
}

/// Compose the outward response. Pure; cannot fail.
pub fn assemble(
    result: ClassificationResult,
    top_shap: Vec<Explanation>,
    text: String,
    validation: Option<ValidationReport>,
    version: &VersionInfo,
) -> TabularResponse {
    TabularResponse {
        label: result.label,
        probabilities: result.probabilities,
        calibrated_confidence: result.calibrated_confidence,
        reliability_band: result.reliability_band,
        explanations: ExplanationBlock { top_shap, text },
        validation,
        version: version.clone(),
    }
}
