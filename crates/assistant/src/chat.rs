use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::context::AnalysisContext;
use crate::errors::{AssistantResult, BackendError};
use crate::guard::{TopicGuard, REFUSAL_MESSAGE};
use crate::quota::{QuotaDecision, SessionQuota};

pub const LIMIT_MESSAGE: &str = "You've reached the 3-message limit for this session. Please contact us for enterprise services for more AI answers.";

/// Language-model completion behind the assistant.
pub trait ChatBackend: Send + Sync {
    fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String, BackendError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskResponse {
    pub response: String,
    pub remaining_messages: u32,
    pub limit_reached: bool,
}

#[derive(Debug)]
pub struct Assistant<B> {
    backend: B,
    quota: SessionQuota,
    guard: TopicGuard,
}

impl<B: ChatBackend> Assistant<B> {
    pub fn new(backend: B) -> Self {
        Self::with_parts(backend, SessionQuota::default(), TopicGuard::default())
    }

    pub fn with_parts(backend: B, quota: SessionQuota, guard: TopicGuard) -> Self {
        Self {
            backend,
            quota,
            guard,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn quota(&self) -> &SessionQuota {
        &self.quota
    }

    /// Answer one question about `context`.
    ///
    /// Off-topic questions are refused without consuming quota. A backend
    /// failure returns the reserved message to the session.
    pub fn ask(
        &self,
        session_id: &str,
        message: &str,
        context: &AnalysisContext,
    ) -> AssistantResult<AskResponse> {
        if let Some(keyword) = self.guard.off_topic_match(message) {
            info!(session_id, keyword, "off-topic question refused");
            let remaining = self.quota.remaining(session_id)?;
            return Ok(AskResponse {
                response: REFUSAL_MESSAGE.to_string(),
                remaining_messages: remaining,
                limit_reached: remaining == 0,
            });
        }

        let remaining = match self.quota.try_acquire(session_id)? {
            QuotaDecision::Allowed { remaining } => remaining,
            QuotaDecision::Exhausted => {
                info!(session_id, "session message limit reached");
                return Ok(AskResponse {
                    response: LIMIT_MESSAGE.to_string(),
                    remaining_messages: 0,
                    limit_reached: true,
                });
            }
        };

        let answer = match self.backend.complete(&context.system_prompt(), message) {
            Ok(answer) => answer,
            Err(err) => {
                warn!(session_id, error = %err, "chat backend failed");
                self.quota.refund(session_id)?;
                return Err(err.into());
            }
        };

        Ok(AskResponse {
            response: self.guard.filter_output(&answer),
            remaining_messages: remaining,
            limit_reached: remaining == 0,
        })
    }
}
