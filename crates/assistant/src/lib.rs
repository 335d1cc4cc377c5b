//! Conversational helper that answers questions about one classification result.
//!
//! Holds no model state of its own: the classification arrives as an
//! [`AnalysisContext`], completions come from a [`ChatBackend`], and each
//! session is limited to a fixed number of answered questions.

mod chat;
mod context;
mod errors;
mod guard;
mod quota;

pub use chat::{Assistant, AskResponse, ChatBackend, LIMIT_MESSAGE};
pub use context::{AnalysisContext, FeatureNote};
pub use errors::{AssistantError, AssistantResult, BackendError};
pub use guard::{
    TopicGuard, DEFAULT_BLOCKED_OUTPUT_KEYWORDS, DEFAULT_OFF_TOPIC_KEYWORDS, MAX_RESPONSE_WORDS,
    REFUSAL_MESSAGE,
};
pub use quota::{QuotaDecision, SessionQuota, DEFAULT_MESSAGE_LIMIT};
