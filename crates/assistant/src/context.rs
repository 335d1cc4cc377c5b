use std::collections::BTreeMap;
use std::fmt::Write as _;

use inference::{NamedFeatures, TabularResponse};
use serde::{Deserialize, Serialize};

use crate::guard::{MAX_RESPONSE_WORDS, REFUSAL_MESSAGE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureNote {
    pub feature: String,
    /// Share of the explanation weight, 0..=1.
    pub importance: f64,
    pub value: Option<f64>,
}

/// Read-only view of one classification handed to the assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisContext {
    pub verdict: String,
    /// Calibrated confidence as a whole percentage.
    pub confidence: u32,
    pub features: Vec<FeatureNote>,
    pub explanation: String,
    pub input_values: BTreeMap<String, f64>,
}

impl AnalysisContext {
    pub fn from_response(response: &TabularResponse, inputs: &NamedFeatures) -> Self {
        let total: f64 = response
            .explanations
            .top_shap
            .iter()
            .map(|e| e.shap.abs())
            .sum();
        let features = response
            .explanations
            .top_shap
            .iter()
            .map(|e| FeatureNote {
                feature: e.feature.clone(),
                importance: if total > 0.0 { e.shap.abs() / total } else { 0.0 },
                value: e.value,
            })
            .collect();

        Self {
            verdict: response.label.as_str().to_string(),
            confidence: (response.calibrated_confidence.clamp(0.0, 1.0) * 100.0).round() as u32,
            features,
            explanation: response.explanations.text.clone(),
            input_values: inputs
                .present()
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        }
    }

    pub fn system_prompt(&self) -> String {
        let mut features = String::new();
        for note in &self.features {
            let value = note
                .value
                .map_or_else(|| "N/A".to_string(), |v| v.to_string());
            let _ = writeln!(
                features,
                "- {}: {:.1}% (value={value})",
                note.feature,
                note.importance * 100.0
            );
        }
        let inputs = self
            .input_values
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "You are a NASA exoplanet detection AI assistant. Your ONLY purpose is to explain exoplanet analysis results to users.

CONTEXT:
- Verdict: {verdict}
- Confidence: {confidence}%
- Top Features:
{features}- Explanation: {explanation}
- User Input Values: {inputs}

RULES:
1. ONLY answer questions about THIS specific analysis result
2. ONLY discuss exoplanet detection, transit method, and the features shown
3. If asked about unrelated topics (politics, general science, other planets, etc.), respond: \"{REFUSAL_MESSAGE}\"
4. Keep responses under {MAX_RESPONSE_WORDS} words
5. Be educational but concise
6. Use the context data to provide specific answers",
            verdict = self.verdict,
            confidence = self.confidence,
            explanation = self.explanation,
        )
    }
}
