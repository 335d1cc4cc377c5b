use std::sync::Arc;

use tracing::{debug, error};

use crate::artifacts::{ArtifactSet, ArtifactStore};
use crate::errors::InferenceResult;
use crate::types::{FeatureVector, FEATURE_COUNT};

/// Output of one pass through imputation, scaling and the classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Inference {
    /// Positive ("confirmed") class probability.
    pub probability: f64,
    /// Per-feature attribution in model order.
    pub attributions: [f64; FEATURE_COUNT],
}

/// Stateless scorer over the shared artifact chain.
#[derive(Debug, Clone)]
pub struct InferenceEngine {
    store: Arc<ArtifactStore>,
}

impl InferenceEngine {
    pub fn new(store: Arc<ArtifactStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<ArtifactStore> {
        &self.store
    }

    /// Positive-class probability for a resolved vector.
    pub fn infer(&self, vector: &FeatureVector) -> InferenceResult<f64> {
        self.infer_detailed(vector).map(|inference| inference.probability)
    }

    /// Score an unchecked slice in model order (the training pipeline's predict contract).
    pub fn infer_values(&self, values: &[Option<f64>]) -> InferenceResult<f64> {
        let vector = FeatureVector::from_values(values)?;
        self.infer(&vector)
    }

    /// Probability plus the attributions the classifier can provide for this vector.
    pub fn infer_detailed(&self, vector: &FeatureVector) -> InferenceResult<Inference> {
        let artifacts = self.store.get_artifacts()?;
        run_chain(&artifacts, vector).map_err(|err| {
            error!(
                version = %artifacts.version_tag,
                error = %err,
                "inference chain failed"
            );
            err
        })
    }
}

fn run_chain(artifacts: &ArtifactSet, vector: &FeatureVector) -> InferenceResult<Inference> {
    let imputed = artifacts.imputer.transform(vector.values())?;
    let scaled = artifacts.scaler.transform(&imputed)?;
    let probability = artifacts.classifier.predict_positive(&scaled)?;
    let attributions = artifacts.classifier.attributions(&scaled);

    debug!(
        version = %artifacts.version_tag,
        imputed_slots = vector.missing().len(),
        probability,
        "inference complete"
    );

    Ok(Inference {
        probability,
        attributions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::InferenceError;
    use crate::test_support::{artifact_dir, logistic, two_stump_forest};
    use crate::types::{Mission, NamedFeatures};
    use crate::{FeatureResolver, ValidationError};

    fn engine_for(classifier: &crate::Classifier) -> (tempfile::TempDir, InferenceEngine) {
        let (tmp, root) = artifact_dir(classifier);
        (tmp, InferenceEngine::new(Arc::new(ArtifactStore::new(root))))
    }

    #[test]
    fn missing_slots_are_imputed_before_scoring() {
        // Only `snr` carries weight and the bias cancels its imputed median.
        let (_tmp, engine) = engine_for(&logistic([0.0, 0.0, 0.0, 0.0, 1.0], -24.6));
        let p = engine
            .infer(&FeatureVector::new([Some(1.0), Some(2.0), None, None, None]))
            .expect("infer");
        assert!((p - 0.5).abs() < 1e-12);
    }

    #[test]
    fn identical_inputs_give_identical_output() {
        let (_tmp, engine) = engine_for(&two_stump_forest());
        let vector = FeatureResolver::new().resolve(
            Mission::Kepler,
            &NamedFeatures {
                period_days: Some(12.3),
                transit_depth_ppm: Some(950.0),
                snr: Some(11.2),
                rp_over_rs: Some(0.03),
                stellar_radius_rs: Some(0.95),
                ..NamedFeatures::default()
            },
        );

        let first = engine.infer_detailed(&vector).expect("infer");
        for _ in 0..10 {
            assert_eq!(engine.infer_detailed(&vector).expect("infer"), first);
        }
        assert!((first.probability - 0.8).abs() < 1e-12);
    }

    #[test]
    fn wrong_length_slice_is_a_validation_error() {
        let (_tmp, engine) = engine_for(&two_stump_forest());
        let err = engine
            .infer_values(&[Some(1.0); 6])
            .expect_err("length mismatch");
        assert_eq!(
            err,
            InferenceError::Validation(ValidationError::WrongLength {
                expected: 5,
                got: 6
            })
        );
    }

    #[test]
    fn artifact_failure_propagates() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let engine = InferenceEngine::new(Arc::new(ArtifactStore::new(tmp.path())));
        let err = engine
            .infer(&FeatureVector::new([Some(1.0); 5]))
            .expect_err("no artifacts");
        assert!(matches!(err, InferenceError::ArtifactUnavailable(_)));
    }

    #[test]
    fn non_finite_scaled_value_is_a_computation_error() {
        let broken = ArtifactSet {
            imputer: crate::test_support::median_imputer(),
            scaler: crate::Scaler {
                feature_names: Vec::new(),
                mean: vec![f64::MIN; 5],
                scale: vec![1.0; 5],
            },
            classifier: two_stump_forest(),
            version_tag: "broken".to_string(),
        };
        let err = run_chain(&broken, &FeatureVector::new([Some(f64::MAX); 5]))
            .expect_err("scaled value overflows");
        assert!(matches!(err, InferenceError::Computation(_)));
    }
}
