use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, RwLock};

use crate::errors::{AssistantError, AssistantResult};

pub const DEFAULT_MESSAGE_LIMIT: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaDecision {
    Allowed { remaining: u32 },
    Exhausted,
}

/// Per-session message counters.
///
/// The map lock is only taken for writing when a session is first seen; every
/// increment-and-check runs on the session's own atomic.
#[derive(Debug)]
pub struct SessionQuota {
    limit: u32,
    sessions: RwLock<HashMap<String, Arc<AtomicU32>>>,
}

impl SessionQuota {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Reserve one message for `session_id` iff fewer than `limit` were used.
    pub fn try_acquire(&self, session_id: &str) -> AssistantResult<QuotaDecision> {
        let counter = self.counter(session_id)?;
        let limit = self.limit;
        let decision = match counter.fetch_update(Ordering::AcqRel, Ordering::Acquire, |used| {
            (used < limit).then_some(used + 1)
        }) {
            Ok(previous) => QuotaDecision::Allowed {
                remaining: limit - previous - 1,
            },
            Err(_) => QuotaDecision::Exhausted,
        };
        Ok(decision)
    }

    /// Give back a reservation whose message was never answered.
    pub fn refund(&self, session_id: &str) -> AssistantResult<()> {
        let counter = self.counter(session_id)?;
        let _ = counter.fetch_update(Ordering::AcqRel, Ordering::Acquire, |used| {
            used.checked_sub(1)
        });
        Ok(())
    }

    pub fn used(&self, session_id: &str) -> AssistantResult<u32> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| AssistantError::QuotaUnavailable)?;
        Ok(sessions
            .get(session_id)
            .map_or(0, |counter| counter.load(Ordering::Acquire)))
    }

    pub fn remaining(&self, session_id: &str) -> AssistantResult<u32> {
        Ok(self.limit.saturating_sub(self.used(session_id)?))
    }

    fn counter(&self, session_id: &str) -> AssistantResult<Arc<AtomicU32>> {
        {
            let sessions = self
                .sessions
                .read()
                .map_err(|_| AssistantError::QuotaUnavailable)?;
            if let Some(counter) = sessions.get(session_id) {
                return Ok(Arc::clone(counter));
            }
        }

        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| AssistantError::QuotaUnavailable)?;
        Ok(Arc::clone(
            sessions.entry(session_id.to_string()).or_default(),
        ))
    }
}

impl Default for SessionQuota {
    fn default() -> Self {
        Self::new(DEFAULT_MESSAGE_LIMIT)
    }
}
