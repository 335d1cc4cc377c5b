use thiserror::Error;

/// Failure reported by a [`crate::ChatBackend`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct BackendError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssistantError {
    #[error("chat backend failed: {0}")]
    Backend(#[from] BackendError),
    #[error("session quota state is unavailable")]
    QuotaUnavailable,
}

impl AssistantError {
    /// Message safe to show the end user.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::Backend(_) | Self::QuotaUnavailable => {
                "Unable to process your question. Please try again."
            }
        }
    }
}

pub type AssistantResult<T> = Result<T, AssistantError>;
