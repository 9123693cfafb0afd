//! Join collaborator trait and types.
//!
//! The real-time transport is opaque to roomcall. Anything that can join,
//! leave and destroy a session can back the orchestrator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for call client operations.
pub type CallResult<T> = Result<T, CallError>;

/// Errors reported by a call client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    #[error("Join failed: {0}")]
    Join(String),

    #[error("Leave failed: {0}")]
    Leave(String),

    #[error("Destroy failed: {0}")]
    Destroy(String),
}

/// Parameters passed to [`CallClient::join`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JoinParams {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Always `false`; sessions are audio-only
    pub video_source: bool,
    pub start_audio_off: bool,
}

impl JoinParams {
    pub fn new(url: impl Into<String>, token: Option<String>, start_audio_off: bool) -> Self {
        Self {
            url: url.into(),
            token,
            video_source: false,
            start_audio_off,
        }
    }
}

/// Real-time session transport.
///
/// A single client is shared for the lifetime of the process and holds at
/// most one active session. `leave` and `destroy` must succeed as no-ops
/// when no session is active.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CallClient: Send + Sync {
    /// Join the room described by `params`.
    async fn join(&self, params: JoinParams) -> CallResult<()>;

    /// Leave the current room.
    async fn leave(&self) -> CallResult<()>;

    /// Release all transport resources.
    async fn destroy(&self) -> CallResult<()>;
}
