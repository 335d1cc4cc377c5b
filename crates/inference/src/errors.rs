use thiserror::Error;

/// Caller-supplied input did not satisfy the schema.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("missing required features: {}", .fields.join(", "))]
    MissingFeatures { fields: Vec<String> },
    #[error("expected {expected} input features, got {got}")]
    WrongLength { expected: usize, got: usize },
    #[error("input feature {field} is not a finite number")]
    NonFinite { field: String },
    #[error("mission indicator {field} must be 0 or 1, got {value}")]
    InvalidIndicator { field: String, value: f64 },
    #[error("more than one mission indicator is set")]
    MultipleMissions,
    #[error("unknown mission {value:?}")]
    UnknownMission { value: String },
    #[error("unsupported light-curve source {value:?}")]
    UnknownSource { value: String },
}

impl ValidationError {
    /// Field names the caller should correct.
    pub fn fields(&self) -> Vec<String> {
        match self {
            Self::MissingFeatures { fields } => fields.clone(),
            Self::WrongLength { .. } | Self::MultipleMissions => {
                vec!["input_features".to_string()]
            }
            Self::NonFinite { field } | Self::InvalidIndicator { field, .. } => {
                vec![field.clone()]
            }
            Self::UnknownMission { .. } => vec!["mission".to_string()],
            Self::UnknownSource { .. } => vec!["input.source".to_string()],
        }
    }
}

/// One of the artifact files is missing, unreadable or corrupt.
///
/// Carries the artifact file name only; the resolved directory is logged, never returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArtifactError {
    #[error("artifact {file} is missing")]
    Missing { file: String },
    #[error("artifact {file} could not be read: {reason}")]
    Unreadable { file: String, reason: String },
    #[error("artifact {file} is corrupt: {reason}")]
    Corrupt { file: String, reason: String },
}

impl ArtifactError {
    pub fn file(&self) -> &str {
        match self {
            Self::Missing { file } | Self::Unreadable { file, .. } | Self::Corrupt { file, .. } => {
                file
            }
        }
    }
}

/// Unexpected shape or numeric failure inside the imputation/scaling/prediction chain.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComputationError {
    #[error("{stage} expected {expected} values, got {got}")]
    ShapeMismatch {
        stage: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("{stage} produced a non-finite value at slot {slot}")]
    NonFinite { stage: &'static str, slot: usize },
    #[error("classifier produced probability {value} outside [0, 1]")]
    ProbabilityOutOfRange { value: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    ArtifactUnavailable,
    Computation,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation_error",
            Self::ArtifactUnavailable => "artifact_unavailable",
            Self::Computation => "computation_error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("artifacts unavailable: {0}")]
    ArtifactUnavailable(#[from] ArtifactError),
    #[error("computation failed: {0}")]
    Computation(#[from] ComputationError),
}

impl InferenceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::ArtifactUnavailable(_) => ErrorKind::ArtifactUnavailable,
            Self::Computation(_) => ErrorKind::Computation,
        }
    }

    /// Message safe to hand to a remote caller.
    ///
    /// Validation failures name the offending fields; the other kinds are generic.
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::ArtifactUnavailable(_) => "service unavailable".to_string(),
            Self::Computation(_) => "inference failed".to_string(),
        }
    }
}

pub type InferenceResult<T> = std::result::Result<T, InferenceError>;
