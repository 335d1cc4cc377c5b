//! Light-curve analysis endpoint shape.
//!
//! The detrend → search → fit → vetting pipeline is not implemented; [`analyze`]
//! validates the request and returns a fixed result with the same response
//! philosophy as the tabular path.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ValidationError;
use crate::response::ExplanationBlock;
use crate::types::{Explanation, Label, Mission};

pub const LIGHTCURVE_SOURCES: [&str; 4] = ["upload", "fits", "csv", "remote"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightCurveInput {
    pub source: String,
    #[serde(default)]
    pub mission: Option<Mission>,
    #[serde(default)]
    pub object_id: Option<String>,
    #[serde(default)]
    pub urls: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightCurveData {
    pub time: Vec<f64>,
    pub flux: Vec<f64>,
    #[serde(default)]
    pub flux_err: Option<Vec<f64>>,
    #[serde(default)]
    pub quality: Option<Vec<i64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightCurveRequest {
    pub input: LightCurveInput,
    #[serde(default)]
    pub data: Option<LightCurveData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitParams {
    pub period_days: f64,
    pub epoch_bjd: f64,
    pub duration_hours: f64,
    pub depth_ppm: f64,
    pub rp_over_rs: f64,
    pub impact_parameter: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vetting {
    pub odd_even_consistent: bool,
    pub secondary_candidate: bool,
    pub centroid_warning: String,
    pub duty_cycle_ok: bool,
    pub snr: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotLinks {
    pub raw_lightcurve_png: String,
    pub detrended_png: String,
    pub periodogram_png: String,
    pub phase_fold_png: String,
    pub odd_even_overlay_png: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightCurveResponse {
    pub label: Label,
    pub probability: f64,
    pub reliability_band: String,
    pub transit_params: TransitParams,
    pub vetting: Vetting,
    pub plots: PlotLinks,
    pub explanations: ExplanationBlock,
    pub report: BTreeMap<String, String>,
    pub version: BTreeMap<String, String>,
}

pub fn analyze(request: &LightCurveRequest) -> Result<LightCurveResponse, ValidationError> {
    validate(request)?;
    debug!(
        source = %request.input.source,
        object_id = request.input.object_id.as_deref().unwrap_or(""),
        samples = request.data.as_ref().map_or(0, |data| data.time.len()),
        "light curve analyzed"
    );
    Ok(fixed_response())
}

fn validate(request: &LightCurveRequest) -> Result<(), ValidationError> {
    if !LIGHTCURVE_SOURCES.contains(&request.input.source.as_str()) {
        return Err(ValidationError::UnknownSource {
            value: request.input.source.clone(),
        });
    }
    if let Some(data) = &request.data {
        if data.flux.len() != data.time.len() {
            return Err(ValidationError::WrongLength {
                expected: data.time.len(),
                got: data.flux.len(),
            });
        }
    }
    Ok(())
}

fn fixed_response() -> LightCurveResponse {
    let params = TransitParams {
        period_days: 12.345,
        epoch_bjd: 2457001.234,
        duration_hours: 2.8,
        depth_ppm: 950.0,
        rp_over_rs: 0.03,
        impact_parameter: 0.35,
    };
    let top_shap = vec![
        Explanation {
            feature: "depth_ppm".to_string(),
            value: Some(params.depth_ppm),
            shap: 0.16,
        },
        Explanation {
            feature: "duration_hours".to_string(),
            value: Some(params.duration_hours),
            shap: 0.12,
        },
    ];

    LightCurveResponse {
        label: Label::Confirmed,
        probability: 0.83,
        reliability_band: crate::DEFAULT_RELIABILITY_BAND.to_string(),
        transit_params: params,
        vetting: Vetting {
            odd_even_consistent: true,
            secondary_candidate: false,
            centroid_warning: "none".to_string(),
            duty_cycle_ok: true,
            snr: 11.2,
        },
        plots: PlotLinks {
            raw_lightcurve_png: "/static/plots/raw.png".to_string(),
            detrended_png: "/static/plots/detrended.png".to_string(),
            periodogram_png: "/static/plots/periodogram.png".to_string(),
            phase_fold_png: "/static/plots/phasefold.png".to_string(),
            odd_even_overlay_png: "/static/plots/oddeven.png".to_string(),
        },
        explanations: ExplanationBlock {
            top_shap,
            text: "Clear periodicity; no secondary; centroid clean. Planet likely.".to_string(),
        },
        report: string_map([("download_url", "/static/reports/last_report.json")]),
        version: string_map([
            ("pipeline", "lc-v1.0"),
            ("detrend", "wotan"),
            ("search", "TLS"),
            ("fit", "batman"),
            ("classifier", "lc-small-v1"),
        ]),
    }
}

fn string_map<const N: usize>(entries: [(&str, &str); N]) -> BTreeMap<String, String> {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
