//! Raw model output → three-label probabilities, label and confidence.

use crate::math::clamp_unit;
use crate::types::{ClassificationResult, Label, NormalizedVector, Probabilities};

/// Share of the non-confirmed mass assigned to CANDIDATE on the named-feature path.
const CANDIDATE_SHARE: f64 = 0.7;
const FALSE_POSITIVE_SHARE: f64 = 0.3;

pub const DEFAULT_RELIABILITY_BAND: &str = "well-calibrated";

/// Named-feature path: split the complement of the positive probability 70/30.
pub fn probabilities_from_positive(p: f64) -> Probabilities {
    let p = clamp_unit(p);
    let rest = 1.0 - p;
    Probabilities {
        confirmed: p,
        candidate: rest * CANDIDATE_SHARE,
        false_positive: rest * FALSE_POSITIVE_SHARE,
    }
}

/// Placeholder heuristic over a pre-normalized vector. Not derived from the trained classifier.
///
/// `score = clamp(0.5 + 0.1 * z_transit_depth_ppm + 0.05 * z_snr)`.
pub fn vector_score(vector: &NormalizedVector) -> f64 {
    let values = vector.values();
    clamp_unit(0.5 + 0.1 * values[1] + 0.05 * values[4])
}

/// Vector path: CONFIRMED = score, CANDIDATE = max(0, 0.8 - score) / 2, rest to FALSE POSITIVE.
pub fn probabilities_from_vector(vector: &NormalizedVector) -> Probabilities {
    let score = vector_score(vector);
    let candidate = (0.8 - score).max(0.0) * 0.5;
    Probabilities {
        confirmed: score,
        candidate,
        false_positive: (1.0 - score - candidate).max(0.0),
    }
}

/// Argmax; exact ties go to the earlier label in [`Label::PRIORITY`].
pub fn select_label(probabilities: &Probabilities) -> Label {
    let mut best = Label::PRIORITY[0];
    let mut best_p = probabilities.get(best);
    for (label, p) in probabilities.iter().skip(1) {
        if p > best_p {
            best = label;
            best_p = p;
        }
    }
    best
}

// Calibration quality is not assessed per request yet.
pub fn reliability_band(_probabilities: &Probabilities) -> &'static str {
    DEFAULT_RELIABILITY_BAND
}

pub fn classify(probabilities: Probabilities) -> ClassificationResult {
    let label = select_label(&probabilities);
    ClassificationResult {
        label,
        probabilities,
        calibrated_confidence: probabilities.get(label),
        reliability_band: reliability_band(&probabilities).to_string(),
    }
}
