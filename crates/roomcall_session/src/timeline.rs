//! Transition timeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use roomcall_core::SessionState;

/// One state transition, recorded in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionEvent {
    /// Unique event ID
    pub id: String,
    /// Timestamp
    pub ts: DateTime<Utc>,
    pub from: SessionState,
    pub to: SessionState,
    /// What caused the transition
    pub trigger: String,
    /// User-facing message set by the transition, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TransitionEvent {
    pub fn new(from: SessionState, to: SessionState, trigger: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            ts: Utc::now(),
            from,
            to,
            trigger: trigger.into(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: Option<String>) -> Self {
        self.message = message;
        self
    }
}
