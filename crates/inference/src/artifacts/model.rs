use serde::{Deserialize, Serialize};

use crate::errors::ComputationError;
use crate::math::{dot, sigmoid};
use crate::types::{FEATURE_COUNT, FEATURE_ORDER};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputeStrategy {
    #[default]
    Median,
    Mean,
    MostFrequent,
    Constant,
}

/// Fills missing slots with a per-feature statistic computed at training time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Imputer {
    #[serde(default)]
    pub strategy: ImputeStrategy,
    /// Must match `FEATURE_ORDER` when present.
    #[serde(default)]
    pub feature_names: Vec<String>,
    pub statistics: Vec<f64>,
}

impl Imputer {
    pub fn validate(&self) -> Result<(), String> {
        check_feature_names(&self.feature_names)?;
        check_vector("statistics", &self.statistics)
    }

    pub fn transform(
        &self,
        values: &[Option<f64>; FEATURE_COUNT],
    ) -> Result<[f64; FEATURE_COUNT], ComputationError> {
        let statistics = fixed("imputer", &self.statistics)?;
        let mut out = [0.0f64; FEATURE_COUNT];
        for (slot, value) in values.iter().enumerate() {
            out[slot] = value.unwrap_or(statistics[slot]);
        }
        Ok(out)
    }
}

/// Standard scaler: `(x - mean) / scale`, with a zero scale treated as 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scaler {
    #[serde(default)]
    pub feature_names: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl Scaler {
    pub fn validate(&self) -> Result<(), String> {
        check_feature_names(&self.feature_names)?;
        check_vector("mean", &self.mean)?;
        check_vector("scale", &self.scale)?;
        if self.scale.iter().any(|s| *s < 0.0) {
            return Err("scale must be non-negative".to_string());
        }
        Ok(())
    }

    pub fn transform(
        &self,
        values: &[f64; FEATURE_COUNT],
    ) -> Result<[f64; FEATURE_COUNT], ComputationError> {
        let mean = fixed("scaler", &self.mean)?;
        let scale = fixed("scaler", &self.scale)?;
        let mut out = [0.0f64; FEATURE_COUNT];
        for slot in 0..FEATURE_COUNT {
            let divisor = if scale[slot] == 0.0 { 1.0 } else { scale[slot] };
            let z = (values[slot] - mean[slot]) / divisor;
            if !z.is_finite() {
                return Err(ComputationError::NonFinite {
                    stage: "scaler",
                    slot,
                });
            }
            out[slot] = z;
        }
        Ok(out)
    }
}

/// Positive-class classifier, tagged by `kind` in the artifact file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classifier {
    RandomForest(RandomForest),
    Logistic(LogisticModel),
}

impl Classifier {
    pub fn model_id(&self) -> &str {
        match self {
            Self::RandomForest(forest) => &forest.model_id,
            Self::Logistic(model) => &model.model_id,
        }
    }

    pub fn model_version(&self) -> &str {
        match self {
            Self::RandomForest(forest) => &forest.model_version,
            Self::Logistic(model) => &model.model_version,
        }
    }

    /// Held-out AUC on a mission the model was not trained on, when the export recorded it.
    pub fn cross_mission_auc(&self) -> Option<f64> {
        match self {
            Self::RandomForest(forest) => forest.cross_mission_auc,
            Self::Logistic(model) => model.cross_mission_auc,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::RandomForest(forest) => forest.validate(),
            Self::Logistic(model) => model.validate(),
        }
    }

    /// Probability of the positive ("confirmed") class for one scaled vector.
    pub fn predict_positive(&self, x: &[f64; FEATURE_COUNT]) -> Result<f64, ComputationError> {
        let p = match self {
            Self::RandomForest(forest) => forest.predict_positive(x)?,
            Self::Logistic(model) => model.predict_positive(x)?,
        };
        if !(0.0..=1.0).contains(&p) {
            return Err(ComputationError::ProbabilityOutOfRange { value: p });
        }
        Ok(p)
    }

    /// Global importances, normalized to sum to 1 when any weight is non-zero.
    pub fn feature_importances(&self) -> [f64; FEATURE_COUNT] {
        let raw: Vec<f64> = match self {
            Self::RandomForest(forest) => forest.feature_importances.clone(),
            Self::Logistic(model) => model.weights.iter().map(|w| w.abs()).collect(),
        };
        let mut out = [0.0f64; FEATURE_COUNT];
        for (slot, value) in raw.iter().take(FEATURE_COUNT).enumerate() {
            out[slot] = if value.is_finite() { value.abs() } else { 0.0 };
        }
        let total: f64 = out.iter().sum();
        if total > 0.0 {
            out.iter_mut().for_each(|v| *v /= total);
        }
        out
    }

    /// Per-request attribution of each scaled feature.
    ///
    /// Linear models report `w_i * z_i`; forests fall back to global importances.
    pub fn attributions(&self, x: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        match self {
            Self::Logistic(model) => {
                let mut out = [0.0f64; FEATURE_COUNT];
                for (slot, (w, z)) in model.weights.iter().zip(x.iter()).enumerate() {
                    out[slot] = w * z;
                }
                out
            }
            Self::RandomForest(_) => self.feature_importances(),
        }
    }
}

/// Bagged decision trees; prediction is the mean positive-class leaf fraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub model_id: String,
    pub model_version: String,
    #[serde(default)]
    pub feature_names: Vec<String>,
    pub feature_importances: Vec<f64>,
    pub trees: Vec<DecisionTree>,
    #[serde(default)]
    pub cross_mission_auc: Option<f64>,
}

impl RandomForest {
    fn validate(&self) -> Result<(), String> {
        check_feature_names(&self.feature_names)?;
        check_vector("feature_importances", &self.feature_importances)?;
        if self.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        for (idx, tree) in self.trees.iter().enumerate() {
            tree.validate().map_err(|reason| format!("tree {idx}: {reason}"))?;
        }
        Ok(())
    }

    fn predict_positive(&self, x: &[f64; FEATURE_COUNT]) -> Result<f64, ComputationError> {
        if self.trees.is_empty() {
            return Err(ComputationError::ShapeMismatch {
                stage: "classifier",
                expected: 1,
                got: 0,
            });
        }
        let mut total = 0.0;
        for (idx, tree) in self.trees.iter().enumerate() {
            total += tree
                .positive_fraction(x)
                .ok_or(ComputationError::NonFinite {
                    stage: "classifier",
                    slot: idx,
                })?;
        }
        Ok(total / self.trees.len() as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    /// Node 0 is the root; children always sit after their parent.
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// `x[feature] <= threshold` descends left.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Training-sample weight per class, `[negative, positive]`.
    Leaf { value: [f64; 2] },
}

impl DecisionTree {
    fn validate(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        let len = self.nodes.len();
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= FEATURE_COUNT {
                        return Err(format!("node {idx} splits on unknown feature {feature}"));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {idx} has a non-finite threshold"));
                    }
                    for child in [*left, *right] {
                        if child <= idx || child >= len {
                            return Err(format!("node {idx} has invalid child {child}"));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if value.iter().any(|v| !v.is_finite() || *v < 0.0) {
                        return Err(format!("leaf {idx} has an invalid class weight"));
                    }
                    if value[0] + value[1] <= 0.0 {
                        return Err(format!("leaf {idx} is empty"));
                    }
                }
            }
        }
        Ok(())
    }

    fn positive_fraction(&self, x: &[f64; FEATURE_COUNT]) -> Option<f64> {
        let mut idx = 0usize;
        // A well-formed tree reaches a leaf in fewer steps than it has nodes.
        for _ in 0..self.nodes.len() {
            match self.nodes.get(idx)? {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = *x.get(*feature)?;
                    idx = if value <= *threshold { *left } else { *right };
                }
                TreeNode::Leaf { value } => {
                    let total = value[0] + value[1];
                    let fraction = value[1] / total;
                    return fraction.is_finite().then_some(fraction);
                }
            }
        }
        None
    }
}

/// Linear-logit model: `sigmoid(w · z + b)` over the scaled vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub model_id: String,
    pub model_version: String,
    pub weights: Vec<f64>,
    pub bias: f64,
    #[serde(default)]
    pub feature_names: Vec<String>,
    #[serde(default)]
    pub cross_mission_auc: Option<f64>,
}

impl LogisticModel {
    fn validate(&self) -> Result<(), String> {
        check_feature_names(&self.feature_names)?;
        check_vector("weights", &self.weights)?;
        if !self.bias.is_finite() {
            return Err(format!("non-finite bias: {}", self.bias));
        }
        Ok(())
    }

    fn predict_positive(&self, x: &[f64; FEATURE_COUNT]) -> Result<f64, ComputationError> {
        if self.weights.len() != FEATURE_COUNT {
            return Err(ComputationError::ShapeMismatch {
                stage: "classifier",
                expected: FEATURE_COUNT,
                got: self.weights.len(),
            });
        }
        let p = sigmoid(dot(&self.weights, x) + self.bias);
        if !p.is_finite() {
            return Err(ComputationError::NonFinite {
                stage: "classifier",
                slot: 0,
            });
        }
        Ok(p)
    }
}

fn check_feature_names(names: &[String]) -> Result<(), String> {
    if names.is_empty() {
        return Ok(());
    }
    if names.len() != FEATURE_COUNT || names.iter().zip(FEATURE_ORDER).any(|(a, b)| a != b) {
        return Err(format!(
            "feature_names {names:?} do not match expected order {FEATURE_ORDER:?}"
        ));
    }
    Ok(())
}

fn check_vector(name: &str, values: &[f64]) -> Result<(), String> {
    if values.len() != FEATURE_COUNT {
        return Err(format!(
            "{name} has {} values, expected {FEATURE_COUNT}",
            values.len()
        ));
    }
    if let Some(idx) = values.iter().position(|v| !v.is_finite()) {
        return Err(format!("{name}[{idx}] is not finite"));
    }
    Ok(())
}

fn fixed<'a>(
    stage: &'static str,
    values: &'a [f64],
) -> Result<&'a [f64; FEATURE_COUNT], ComputationError> {
    values
        .try_into()
        .map_err(|_| ComputationError::ShapeMismatch {
            stage,
            expected: FEATURE_COUNT,
            got: values.len(),
        })
}
