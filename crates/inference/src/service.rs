use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::artifacts::{ArtifactSet, ArtifactStore};
use crate::engine::InferenceEngine;
use crate::errors::InferenceResult;
use crate::explain::{summarize, ExplanationRanker, DEFAULT_TOP_K};
use crate::features::{FeatureResolver, DEFAULT_REQUIRED_FEATURES};
use crate::postprocess::{classify, probabilities_from_positive, probabilities_from_vector};
use crate::response::{
    assemble, TabularRequest, TabularResponse, ValidationReport, VectorRequest, VersionInfo,
};
use crate::types::{FeatureVector, NormalizedVector};

const VECTOR_SUMMARY: &str = "Vector-based request processed.";

/// Construction-time knobs for [`ClassificationService`].
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceOptions {
    pub required_features: Vec<String>,
    pub top_k: usize,
    pub versions: VersionInfo,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            required_features: DEFAULT_REQUIRED_FEATURES
                .iter()
                .map(|name| name.to_string())
                .collect(),
            top_k: DEFAULT_TOP_K,
            versions: VersionInfo::default(),
        }
    }
}

/// Request-level composition of resolver, engine, postprocessing, ranking and assembly.
///
/// Cheap to clone; all clones share one [`ArtifactStore`].
#[derive(Debug, Clone)]
pub struct ClassificationService {
    engine: InferenceEngine,
    resolver: FeatureResolver,
    ranker: ExplanationRanker,
    versions: VersionInfo,
}

impl ClassificationService {
    pub fn new(store: Arc<ArtifactStore>, options: ServiceOptions) -> Self {
        Self {
            engine: InferenceEngine::new(store),
            resolver: FeatureResolver::with_required(&options.required_features),
            ranker: ExplanationRanker::new(options.top_k),
            versions: options.versions,
        }
    }

    pub fn engine(&self) -> &InferenceEngine {
        &self.engine
    }

    pub fn versions(&self) -> &VersionInfo {
        &self.versions
    }

    /// Force the artifact load ahead of the first request.
    pub fn warm_up(&self) -> InferenceResult<Arc<ArtifactSet>> {
        let artifacts = self.engine.store().get_artifacts()?;
        info!(
            version = %artifacts.version_tag,
            model = artifacts.classifier.model_id(),
            "artifacts warmed"
        );
        Ok(artifacts)
    }

    /// Named-feature path.
    pub fn predict(&self, request: &TabularRequest) -> InferenceResult<TabularResponse> {
        let vector = self.resolver.resolve(request.mission, &request.features);
        if let Err(err) = self.resolver.validate(&vector) {
            warn!(
                object_id = %request.object_id,
                mission = %request.mission,
                missing = ?err.fields(),
                "request rejected"
            );
            return Err(err.into());
        }

        let inference = self.engine.infer_detailed(&vector)?;
        let result = classify(probabilities_from_positive(inference.probability));
        let top_shap = self.ranker.rank_features(&vector, &inference.attributions);
        let text = summarize(result.label, &top_shap);

        let cross_mission_auc = self
            .engine
            .store()
            .get_artifacts()
            .ok()
            .and_then(|artifacts| artifacts.classifier.cross_mission_auc());
        let validation = named_validation(&vector, cross_mission_auc);

        debug!(
            object_id = %request.object_id,
            mission = %request.mission,
            label = %result.label,
            confidence = result.calibrated_confidence,
            "tabular prediction"
        );
        Ok(assemble(result, top_shap, text, Some(validation), &self.versions))
    }

    /// Pre-normalized vector path. Never touches the artifact store.
    pub fn predict_vector(&self, request: &VectorRequest) -> InferenceResult<TabularResponse> {
        let vector = NormalizedVector::from_slice(&request.input_features).map_err(|err| {
            warn!(len = request.input_features.len(), error = %err, "vector rejected");
            err
        })?;

        let result = classify(probabilities_from_vector(&vector));
        let top_shap = self.ranker.rank_vector(&vector);
        let validation = vector_validation(&vector);

        debug!(
            label = %result.label,
            confidence = result.calibrated_confidence,
            "vector prediction"
        );
        Ok(assemble(
            result,
            top_shap,
            VECTOR_SUMMARY.to_string(),
            Some(validation),
            &self.versions,
        ))
    }
}

fn named_validation(vector: &FeatureVector, cross_mission_auc: Option<f64>) -> ValidationReport {
    let mut report = ValidationReport::new();
    report.insert("mission_domain_check".into(), Value::from("ok"));
    report.insert(
        "planet_radius_derived".into(),
        Value::from(vector.planet_radius_derived()),
    );
    report.insert(
        "imputed_features".into(),
        Value::from(vector.missing().join(",")),
    );
    if let Some(auc) = cross_mission_auc {
        report.insert("cross_mission_auc".into(), Value::from(auc));
    }
    report
}

fn vector_validation(vector: &NormalizedVector) -> ValidationReport {
    let domain = if vector.mission().is_some() {
        "ok"
    } else {
        "unknown"
    };
    let mut report = ValidationReport::new();
    report.insert("vector_len".into(), Value::from(vector.values().len()));
    report.insert("mission_domain_check".into(), Value::from(domain));
    report
}
