use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Number of numeric features the model consumes.
pub const FEATURE_COUNT: usize = 5;

/// Fixed model input order. Independent of mission.
pub const FEATURE_ORDER: [&str; FEATURE_COUNT] = [
    "period_days",
    "transit_depth_ppm",
    "planet_radius_re",
    "stellar_radius_rs",
    "snr",
];

pub(crate) const PERIOD_DAYS: usize = 0;
pub(crate) const TRANSIT_DEPTH_PPM: usize = 1;
pub(crate) const PLANET_RADIUS_RE: usize = 2;
pub(crate) const STELLAR_RADIUS_RS: usize = 3;
pub(crate) const SNR: usize = 4;

/// Length of a pre-normalized vector: five z-scores plus three mission indicators.
pub const NORMALIZED_LEN: usize = 8;

pub const NORMALIZED_FEATURE_NAMES: [&str; NORMALIZED_LEN] = [
    "z_period_days",
    "z_transit_depth_ppm",
    "z_planet_radius_re",
    "z_stellar_radius_rs",
    "z_snr",
    "mission_K2",
    "mission_KEPLER",
    "mission_TESS",
];

/// One-hot order of the mission indicator slots.
pub const MISSION_ORDER: [Mission; 3] = [Mission::K2, Mission::Kepler, Mission::Tess];

/// Allowed deviation of a probability mapping's total from 1.
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mission {
    K2,
    Kepler,
    Tess,
}

impl Mission {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::K2 => "K2",
            Self::Kepler => "KEPLER",
            Self::Tess => "TESS",
        }
    }

    pub(crate) const fn indicator_index(self) -> usize {
        match self {
            Self::K2 => 0,
            Self::Kepler => 1,
            Self::Tess => 2,
        }
    }
}

impl fmt::Display for Mission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mission {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "K2" => Ok(Self::K2),
            "KEPLER" => Ok(Self::Kepler),
            "TESS" => Ok(Self::Tess),
            other => Err(ValidationError::UnknownMission {
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    #[serde(rename = "CONFIRMED")]
    Confirmed,
    #[serde(rename = "CANDIDATE")]
    Candidate,
    #[serde(rename = "FALSE POSITIVE")]
    FalsePositive,
}

impl Label {
    /// Tie-break order for label selection: earlier wins on equal probability.
    pub const PRIORITY: [Label; 3] = [Label::Confirmed, Label::Candidate, Label::FalsePositive];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Confirmed => "CONFIRMED",
            Self::Candidate => "CANDIDATE",
            Self::FalsePositive => "FALSE POSITIVE",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named-feature payload. Every field is optional; absence is resolved later.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamedFeatures {
    pub period_days: Option<f64>,
    pub epoch: Option<f64>,
    pub duration_hours: Option<f64>,
    pub transit_depth_ppm: Option<f64>,
    pub snr: Option<f64>,
    pub planet_radius_re: Option<f64>,
    pub rp_over_rs: Option<f64>,
    pub impact_parameter: Option<f64>,
    pub stellar_radius_rs: Option<f64>,
    pub kepmag_tmag: Option<f64>,
}

impl NamedFeatures {
    /// Supplied finite values in payload field order.
    pub fn present(&self) -> Vec<(&'static str, f64)> {
        [
            ("period_days", self.period_days),
            ("epoch", self.epoch),
            ("duration_hours", self.duration_hours),
            ("transit_depth_ppm", self.transit_depth_ppm),
            ("snr", self.snr),
            ("planet_radius_re", self.planet_radius_re),
            ("rp_over_rs", self.rp_over_rs),
            ("impact_parameter", self.impact_parameter),
            ("stellar_radius_rs", self.stellar_radius_rs),
            ("kepmag_tmag", self.kepmag_tmag),
        ]
        .into_iter()
        .filter_map(|(name, value)| finite(value).map(|v| (name, v)))
        .collect()
    }
}

/// Model-ordered feature slots before imputation. `None` marks a missing value.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: [Option<f64>; FEATURE_COUNT],
    mission: Option<Mission>,
    planet_radius_derived: bool,
}

impl FeatureVector {
    /// Non-finite values are stored as missing.
    pub fn new(values: [Option<f64>; FEATURE_COUNT]) -> Self {
        Self {
            values: values.map(finite),
            mission: None,
            planet_radius_derived: false,
        }
    }

    /// Build from an arbitrary slice, checking it against the fixed schema length.
    pub fn from_values(values: &[Option<f64>]) -> Result<Self, ValidationError> {
        let fixed: [Option<f64>; FEATURE_COUNT] =
            values.try_into().map_err(|_| ValidationError::WrongLength {
                expected: FEATURE_COUNT,
                got: values.len(),
            })?;
        Ok(Self::new(fixed))
    }

    pub fn with_mission(mut self, mission: Mission) -> Self {
        self.mission = Some(mission);
        self
    }

    pub(crate) fn mark_planet_radius_derived(&mut self) {
        self.planet_radius_derived = true;
    }

    pub fn values(&self) -> &[Option<f64>; FEATURE_COUNT] {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_ORDER
            .iter()
            .position(|candidate| *candidate == name)
            .and_then(|idx| self.values[idx])
    }

    pub fn mission(&self) -> Option<Mission> {
        self.mission
    }

    pub fn planet_radius_derived(&self) -> bool {
        self.planet_radius_derived
    }

    /// Names of the missing slots, in schema order.
    pub fn missing(&self) -> Vec<&'static str> {
        self.named_values()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| name)
            .collect()
    }

    pub fn named_values(&self) -> impl Iterator<Item = (&'static str, Option<f64>)> + '_ {
        FEATURE_ORDER.iter().copied().zip(self.values.iter().copied())
    }
}

/// Pre-normalized 8-slot input: five z-scores then the `[K2, KEPLER, TESS]` one-hot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedVector([f64; NORMALIZED_LEN]);

impl NormalizedVector {
    pub fn from_slice(raw: &[f64]) -> Result<Self, ValidationError> {
        let values: [f64; NORMALIZED_LEN] =
            raw.try_into().map_err(|_| ValidationError::WrongLength {
                expected: NORMALIZED_LEN,
                got: raw.len(),
            })?;

        for (name, value) in NORMALIZED_FEATURE_NAMES.iter().zip(values.iter()) {
            if !value.is_finite() {
                return Err(ValidationError::NonFinite {
                    field: (*name).to_string(),
                });
            }
        }

        let indicators = &values[FEATURE_COUNT..];
        for (name, value) in NORMALIZED_FEATURE_NAMES[FEATURE_COUNT..]
            .iter()
            .zip(indicators.iter())
        {
            if *value != 0.0 && *value != 1.0 {
                return Err(ValidationError::InvalidIndicator {
                    field: (*name).to_string(),
                    value: *value,
                });
            }
        }
        if indicators.iter().filter(|v| **v == 1.0).count() > 1 {
            return Err(ValidationError::MultipleMissions);
        }

        Ok(Self(values))
    }

    pub fn values(&self) -> &[f64; NORMALIZED_LEN] {
        &self.0
    }

    pub fn get(&self, idx: usize) -> Option<f64> {
        self.0.get(idx).copied()
    }

    /// The flagged mission, or `None` when every indicator is zero.
    pub fn mission(&self) -> Option<Mission> {
        MISSION_ORDER
            .iter()
            .copied()
            .find(|mission| self.0[FEATURE_COUNT + mission.indicator_index()] == 1.0)
    }
}

/// Probability mapping over exactly the three labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Probabilities {
    #[serde(rename = "CONFIRMED")]
    pub confirmed: f64,
    #[serde(rename = "CANDIDATE")]
    pub candidate: f64,
    #[serde(rename = "FALSE POSITIVE")]
    pub false_positive: f64,
}

impl Probabilities {
    pub fn get(&self, label: Label) -> f64 {
        match label {
            Label::Confirmed => self.confirmed,
            Label::Candidate => self.candidate,
            Label::FalsePositive => self.false_positive,
        }
    }

    pub fn total(&self) -> f64 {
        self.confirmed + self.candidate + self.false_positive
    }

    pub fn is_normalized(&self) -> bool {
        let non_negative = Label::PRIORITY.iter().all(|label| self.get(*label) >= 0.0);
        non_negative && (self.total() - 1.0).abs() <= PROBABILITY_TOLERANCE
    }

    /// Entries in label priority order.
    pub fn iter(&self) -> impl Iterator<Item = (Label, f64)> + '_ {
        Label::PRIORITY.iter().map(move |label| (*label, self.get(*label)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: Label,
    pub probabilities: Probabilities,
    pub calibrated_confidence: f64,
    pub reliability_band: String,
}

/// One ranked explanation entry. Serialized with the `shap` key of the wire contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub feature: String,
    pub value: Option<f64>,
    pub shap: f64,
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}
