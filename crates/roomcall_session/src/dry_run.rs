//! Dry-run call client.
//!
//! Logs what a real transport would do and enforces the single-session
//! rule. Used by the CLI to exercise the orchestrator end to end.

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::info;

use crate::call::{CallClient, CallError, CallResult, JoinParams};

/// Call client that joins nothing.
#[derive(Default)]
pub struct DryRunCallClient {
    active_room: Mutex<Option<String>>,
}

impl DryRunCallClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Room of the current session, if any.
    pub fn active_room(&self) -> Option<String> {
        self.active_room.lock().clone()
    }
}

#[async_trait]
impl CallClient for DryRunCallClient {
    async fn join(&self, params: JoinParams) -> CallResult<()> {
        let mut active = self.active_room.lock();
        if let Some(current) = active.as_ref() {
            return Err(CallError::Join(format!("already in session {}", current)));
        }

        info!(
            room_url = %params.url,
            has_token = params.token.is_some(),
            start_audio_off = params.start_audio_off,
            "[dry-run] Joining room"
        );
        *active = Some(params.url);
        Ok(())
    }

    async fn leave(&self) -> CallResult<()> {
        match self.active_room.lock().take() {
            Some(room) => info!(room_url = %room, "[dry-run] Left room"),
            None => info!("[dry-run] Leave with no active session"),
        }
        Ok(())
    }

    async fn destroy(&self) -> CallResult<()> {
        self.active_room.lock().take();
        info!("[dry-run] Call client destroyed");
        Ok(())
    }
}
