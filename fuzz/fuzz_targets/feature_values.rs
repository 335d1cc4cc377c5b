#![no_main]

use inference::{
    classify, probabilities_from_vector, ExplanationRanker, FeatureResolver, FeatureVector,
    Mission, NamedFeatures, NormalizedVector, MISSION_ORDER,
};
use libfuzzer_sys::fuzz_target;

fn floats(data: &[u8]) -> Vec<f64> {
    data.chunks_exact(8)
        .map(|chunk| {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(chunk);
            f64::from_le_bytes(bytes)
        })
        .collect()
}

fn slot(values: &[f64], idx: usize) -> Option<f64> {
    values.get(idx).copied()
}

fuzz_target!(|data: &[u8]| {
    let mission: Mission = MISSION_ORDER[usize::from(data.first().copied().unwrap_or_default()) % 3];
    let values = floats(data.get(1..).unwrap_or_default());

    let features = NamedFeatures {
        period_days: slot(&values, 0),
        transit_depth_ppm: slot(&values, 1),
        planet_radius_re: slot(&values, 2),
        stellar_radius_rs: slot(&values, 3),
        snr: slot(&values, 4),
        rp_over_rs: slot(&values, 5),
        ..NamedFeatures::default()
    };
    let resolver = FeatureResolver::new();
    let resolved = resolver.resolve(mission, &features);
    assert!(resolved.values().iter().flatten().all(|v| v.is_finite()));
    let _ = resolver.validate(&resolved);

    let optional: Vec<Option<f64>> = values.iter().copied().map(Some).collect();
    let _ = FeatureVector::from_values(&optional);

    if let Ok(vector) = NormalizedVector::from_slice(&values) {
        let result = classify(probabilities_from_vector(&vector));
        assert!(result.probabilities.is_normalized());
        let ranked = ExplanationRanker::default().rank_vector(&vector);
        assert!(ranked.len() <= 3);
    }
});
