//! Ranked, bounded feature explanations.

use std::cmp::Ordering;

use crate::types::{Explanation, FeatureVector, Label, NormalizedVector, FEATURE_COUNT};

pub const DEFAULT_TOP_K: usize = 3;

/// Static attribution weights for the vector path: `(feature, vector slot, weight)`.
pub const VECTOR_ATTRIBUTIONS: [(&str, usize, f64); 3] = [
    ("z_transit_depth_ppm", 1, 0.18),
    ("z_snr", 4, 0.12),
    ("z_planet_radius_re", 2, 0.09),
];

#[derive(Debug, Clone, Copy)]
pub struct ExplanationRanker {
    top_k: usize,
}

impl ExplanationRanker {
    /// `top_k` is raised to 1 when given as zero.
    pub fn new(top_k: usize) -> Self {
        Self {
            top_k: top_k.max(1),
        }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Order by descending |attribution| and keep the first `top_k`.
    ///
    /// Stable: equal magnitudes keep their input order. A non-finite score ranks as zero.
    /// Absent values stay in the output as `None`.
    pub fn rank<'a, I>(&self, entries: I) -> Vec<Explanation>
    where
        I: IntoIterator<Item = (&'a str, Option<f64>, f64)>,
    {
        let mut ranked: Vec<Explanation> = entries
            .into_iter()
            .map(|(feature, value, shap)| Explanation {
                feature: feature.to_string(),
                value: value.filter(|v| v.is_finite()),
                shap: if shap.is_finite() { shap } else { 0.0 },
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.shap
                .abs()
                .partial_cmp(&a.shap.abs())
                .unwrap_or(Ordering::Equal)
        });
        ranked.truncate(self.top_k);
        ranked
    }

    /// Named path: model feature names paired with the resolved (pre-imputation) values.
    pub fn rank_features(
        &self,
        vector: &FeatureVector,
        attributions: &[f64; FEATURE_COUNT],
    ) -> Vec<Explanation> {
        self.rank(
            vector
                .named_values()
                .zip(attributions.iter().copied())
                .map(|((name, value), shap)| (name, value, shap)),
        )
    }

    /// Vector path: static weights over the vector's own slots.
    pub fn rank_vector(&self, vector: &NormalizedVector) -> Vec<Explanation> {
        self.rank(
            VECTOR_ATTRIBUTIONS
                .iter()
                .map(|(name, slot, weight)| (*name, vector.get(*slot), *weight)),
        )
    }
}

impl Default for ExplanationRanker {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_K)
    }
}

/// One-line summary naming the label and the leading features.
pub fn summarize(label: Label, explanations: &[Explanation]) -> String {
    let lead = match label {
        Label::Confirmed => "Signal consistent with a planetary transit",
        Label::Candidate => "Transit signal plausible but not conclusive",
        Label::FalsePositive => "Signal more consistent with a false positive",
    };
    if explanations.is_empty() {
        return format!("{lead}.");
    }

    let drivers: Vec<&str> = explanations.iter().map(|e| e.feature.as_str()).collect();
    format!("{lead}; driven mainly by {}.", drivers.join(", "))
}
