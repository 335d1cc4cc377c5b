//! Named-feature resolution into the fixed model order.

use tracing::debug;

use crate::errors::ValidationError;
use crate::types::{
    FeatureVector, Mission, NamedFeatures, FEATURE_COUNT, FEATURE_ORDER, PERIOD_DAYS,
    PLANET_RADIUS_RE, SNR, STELLAR_RADIUS_RS, TRANSIT_DEPTH_PPM,
};

/// Earth radii per solar radius, used to derive planet radius from `rp_over_rs`.
pub const EARTH_RADII_PER_SOLAR_RADIUS: f64 = 109.0;

/// Directly observed transit measurements with no derivation path.
pub const DEFAULT_REQUIRED_FEATURES: [&str; 3] = ["period_days", "transit_depth_ppm", "snr"];

#[derive(Debug, Clone)]
pub struct FeatureResolver {
    required: Vec<&'static str>,
}

impl FeatureResolver {
    pub fn new() -> Self {
        Self {
            required: DEFAULT_REQUIRED_FEATURES.to_vec(),
        }
    }

    /// Require a different subset of the model features.
    ///
    /// Names outside `FEATURE_ORDER` are ignored; the result is kept in schema order.
    pub fn with_required<S: AsRef<str>>(required: &[S]) -> Self {
        let required = FEATURE_ORDER
            .iter()
            .copied()
            .filter(|name| required.iter().any(|r| r.as_ref() == *name))
            .collect();
        Self { required }
    }

    pub fn required(&self) -> &[&'static str] {
        &self.required
    }

    /// Map a partial named-feature payload onto the 5-slot model order.
    ///
    /// Never fails: absent values stay `None` for the validation step to judge.
    pub fn resolve(&self, mission: Mission, features: &NamedFeatures) -> FeatureVector {
        let mut values = [None; FEATURE_COUNT];
        values[PERIOD_DAYS] = present(features.period_days);
        values[TRANSIT_DEPTH_PPM] = present(features.transit_depth_ppm);
        values[PLANET_RADIUS_RE] = present(features.planet_radius_re);
        values[STELLAR_RADIUS_RS] = present(features.stellar_radius_rs);
        values[SNR] = present(features.snr);

        let mut derived = false;
        if values[PLANET_RADIUS_RE].is_none() {
            values[PLANET_RADIUS_RE] = derive_planet_radius(
                present(features.rp_over_rs),
                values[STELLAR_RADIUS_RS],
            );
            derived = values[PLANET_RADIUS_RE].is_some();
        }

        let mut vector = FeatureVector::new(values).with_mission(mission);
        if derived {
            vector.mark_planet_radius_derived();
            debug!(
                mission = %mission,
                planet_radius_re = vector.get("planet_radius_re"),
                "planet radius derived from rp_over_rs"
            );
        }
        vector
    }

    /// Reject a resolved vector that lacks any required feature.
    pub fn validate(&self, vector: &FeatureVector) -> Result<(), ValidationError> {
        let missing: Vec<String> = vector
            .missing()
            .into_iter()
            .filter(|name| self.required.contains(name))
            .map(str::to_string)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingFeatures { fields: missing })
        }
    }
}

impl Default for FeatureResolver {
    fn default() -> Self {
        Self::new()
    }
}

fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// `rp_over_rs * stellar_radius_rs * 109`; any non-finite result yields `None`.
fn derive_planet_radius(rp_over_rs: Option<f64>, stellar_radius_rs: Option<f64>) -> Option<f64> {
    let radius = rp_over_rs? * stellar_radius_rs? * EARTH_RADII_PER_SOLAR_RADIUS;
    radius.is_finite().then_some(radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kepler(features: NamedFeatures) -> FeatureVector {
        FeatureResolver::new().resolve(Mission::Kepler, &features)
    }

    #[test]
    fn derives_planet_radius_from_ratio_and_stellar_radius() {
        let vector = kepler(NamedFeatures {
            rp_over_rs: Some(0.03),
            stellar_radius_rs: Some(1.0),
            ..NamedFeatures::default()
        });
        let radius = vector.get("planet_radius_re").expect("derived radius");
        assert!((radius - 3.27).abs() < 1e-6);
        assert!(vector.planet_radius_derived());
    }

    #[test]
    fn direct_planet_radius_wins_over_derivation() {
        let vector = kepler(NamedFeatures {
            planet_radius_re: Some(2.0),
            rp_over_rs: Some(0.03),
            stellar_radius_rs: Some(1.0),
            ..NamedFeatures::default()
        });
        assert_eq!(vector.get("planet_radius_re"), Some(2.0));
        assert!(!vector.planet_radius_derived());
    }

    #[test]
    fn derivation_needs_both_inputs() {
        let vector = kepler(NamedFeatures {
            rp_over_rs: Some(0.03),
            ..NamedFeatures::default()
        });
        assert_eq!(vector.get("planet_radius_re"), None);
        assert!(!vector.planet_radius_derived());
    }

    #[test]
    fn overflowing_derivation_degrades_to_missing() {
        let vector = kepler(NamedFeatures {
            rp_over_rs: Some(f64::MAX),
            stellar_radius_rs: Some(f64::MAX),
            ..NamedFeatures::default()
        });
        assert_eq!(vector.get("planet_radius_re"), None);
        assert_eq!(vector.get("stellar_radius_rs"), Some(f64::MAX));
    }

    #[test]
    fn output_order_is_fixed_and_ignores_auxiliary_fields() {
        let features = NamedFeatures {
            period_days: Some(1.0),
            epoch: Some(2454833.0),
            duration_hours: Some(3.1),
            transit_depth_ppm: Some(2.0),
            snr: Some(5.0),
            planet_radius_re: Some(3.0),
            impact_parameter: Some(0.4),
            stellar_radius_rs: Some(4.0),
            kepmag_tmag: Some(13.2),
            ..NamedFeatures::default()
        };
        for mission in [Mission::K2, Mission::Kepler, Mission::Tess] {
            let vector = FeatureResolver::new().resolve(mission, &features);
            assert_eq!(
                vector.values(),
                &[Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)]
            );
            assert_eq!(vector.mission(), Some(mission));
        }
    }

    #[test]
    fn missing_required_fields_are_named_in_schema_order() {
        let resolver = FeatureResolver::new();
        let vector = resolver.resolve(
            Mission::Tess,
            &NamedFeatures {
                transit_depth_ppm: Some(850.0),
                planet_radius_re: Some(2.1),
                stellar_radius_rs: Some(0.9),
                ..NamedFeatures::default()
            },
        );
        let err = resolver.validate(&vector).expect_err("validation must fail");
        assert_eq!(
            err,
            ValidationError::MissingFeatures {
                fields: vec!["period_days".to_string(), "snr".to_string()]
            }
        );
    }

    #[test]
    fn optional_model_features_may_be_absent() {
        let resolver = FeatureResolver::new();
        let vector = resolver.resolve(
            Mission::K2,
            &NamedFeatures {
                period_days: Some(3.5),
                transit_depth_ppm: Some(1200.0),
                snr: Some(18.0),
                ..NamedFeatures::default()
            },
        );
        resolver.validate(&vector).expect("only derivable fields missing");
        assert_eq!(vector.missing(), vec!["planet_radius_re", "stellar_radius_rs"]);
    }

    #[test]
    fn custom_required_set_is_kept_in_schema_order() {
        let resolver = FeatureResolver::with_required(&["snr", "bogus", "period_days"]);
        assert_eq!(resolver.required(), &["period_days", "snr"]);
    }

    #[test]
    fn non_finite_inputs_count_as_missing() {
        let vector = kepler(NamedFeatures {
            period_days: Some(f64::NAN),
            snr: Some(f64::INFINITY),
            ..NamedFeatures::default()
        });
        assert_eq!(vector.get("period_days"), None);
        assert_eq!(vector.get("snr"), None);
    }

    #[test]
    fn raw_slice_must_match_schema_length() {
        let err = FeatureVector::from_values(&[Some(1.0); 4]).expect_err("wrong length");
        assert_eq!(
            err,
            ValidationError::WrongLength {
                expected: FEATURE_COUNT,
                got: 4
            }
        );
    }
}
