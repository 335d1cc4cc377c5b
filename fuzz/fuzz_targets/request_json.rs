#![no_main]

use std::sync::Arc;

use inference::lightcurve::{self, LightCurveRequest};
use inference::{
    default_artifacts_root, ArtifactStore, ClassificationService, ServiceOptions, TabularRequest,
    VectorRequest,
};
use libfuzzer_sys::fuzz_target;
use once_cell::sync::Lazy;

static SERVICE: Lazy<ClassificationService> = Lazy::new(|| {
    ClassificationService::new(
        Arc::new(ArtifactStore::new(default_artifacts_root())),
        ServiceOptions::default(),
    )
});

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(request) = serde_json::from_str::<TabularRequest>(text) {
        if let Ok(response) = SERVICE.predict(&request) {
            assert!(response.probabilities.is_normalized());
            let _ = serde_json::to_string(&response);
        }
    }
    if let Ok(request) = serde_json::from_str::<VectorRequest>(text) {
        if let Ok(response) = SERVICE.predict_vector(&request) {
            assert!(response.probabilities.is_normalized());
        }
    }
    if let Ok(request) = serde_json::from_str::<LightCurveRequest>(text) {
        let _ = lightcurve::analyze(&request);
    }
});
