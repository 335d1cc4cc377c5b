//! Inference and explanation engine for exoplanet-candidate classification.
//!
//! A request flows through:
//!
//! ```text
//! named features ─→ FeatureResolver ─→ InferenceEngine ─→ postprocess ─→ ExplanationRanker ─→ assemble
//!                                          │
//!                                    ArtifactStore (imputer, scaler, classifier)
//!
//! normalized vector ─────────────────→ postprocess (vector heuristic) ─→ ExplanationRanker ─→ assemble
//! ```
//!
//! The only shared state is the lazily loaded [`ArtifactSet`] owned by an
//! [`ArtifactStore`]. Everything else is a pure function of its inputs.

pub mod artifacts;
mod engine;
mod errors;
mod explain;
mod features;
pub mod lightcurve;
mod math;
mod postprocess;
mod response;
mod service;
mod types;

pub use artifacts::{
    default_artifacts_root, ArtifactLoader, ArtifactSet, ArtifactStore, Classifier, Imputer,
    JsonArtifactLoader, Scaler, CLASSIFIER_FILE, IMPUTER_FILE, SCALER_FILE,
};
pub use engine::{Inference, InferenceEngine};
pub use errors::{
    ArtifactError, ComputationError, ErrorKind, InferenceError, InferenceResult, ValidationError,
};
pub use explain::{summarize, ExplanationRanker, DEFAULT_TOP_K, VECTOR_ATTRIBUTIONS};
pub use features::{FeatureResolver, DEFAULT_REQUIRED_FEATURES, EARTH_RADII_PER_SOLAR_RADIUS};
pub use postprocess::{
    classify, probabilities_from_positive, probabilities_from_vector, reliability_band,
    select_label, vector_score, DEFAULT_RELIABILITY_BAND,
};
pub use response::{
    assemble, ExplanationBlock, RawRow, TabularRequest, TabularResponse, ValidationReport,
    VectorRequest, VersionInfo,
};
pub use service::{ClassificationService, ServiceOptions};
pub use types::{
    ClassificationResult, Explanation, FeatureVector, Label, Mission, NamedFeatures,
    NormalizedVector, Probabilities, FEATURE_COUNT, FEATURE_ORDER, MISSION_ORDER,
    NORMALIZED_FEATURE_NAMES, NORMALIZED_LEN, PROBABILITY_TOLERANCE,
};

#[cfg(test)]
mod test_support;
