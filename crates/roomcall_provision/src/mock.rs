//! Mock provisioner for testing.
//!
//! Provides a scripted implementation of the [`AgentProvisioner`] trait so
//! orchestrator tests can run without a provisioning backend.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::Notify;

use crate::error::{ProvisionError, ProvisionResult};
use crate::provisioner::{AgentProvisioner, ProvisioningOutcome};

/// Captured call information for verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionCall {
    CreateRoom,
    StartBot { url: String, token: String },
}

/// Mock provisioner for testing.
///
/// Returns queued outcomes from `create_room` in order. Once the queue is
/// drained, the default outcome is returned.
#[derive(Clone)]
pub struct MockProvisioner {
    outcomes: Arc<RwLock<VecDeque<ProvisioningOutcome>>>,
    default_outcome: Arc<RwLock<ProvisioningOutcome>>,
    start_bot_failure: Arc<RwLock<Option<String>>>,
    captured_calls: Arc<RwLock<Vec<ProvisionCall>>>,
    bot_started: Arc<Notify>,
}

impl Default for MockProvisioner {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvisioner {
    /// Create a mock whose rooms are always created successfully.
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(RwLock::new(VecDeque::new())),
            default_outcome: Arc::new(RwLock::new(ProvisioningOutcome::Success {
                url: "https://mock.example-provider.com/mock-room".to_string(),
                token: "mock-token".to_string(),
            })),
            start_bot_failure: Arc::new(RwLock::new(None)),
            captured_calls: Arc::new(RwLock::new(Vec::new())),
            bot_started: Arc::new(Notify::new()),
        }
    }

    /// Queue an outcome for the next `create_room` call.
    pub fn add_outcome(self, outcome: ProvisioningOutcome) -> Self {
        self.outcomes.write().push_back(outcome);
        self
    }

    /// Outcome returned once the queue is empty.
    pub fn with_default_outcome(self, outcome: ProvisioningOutcome) -> Self {
        *self.default_outcome.write() = outcome;
        self
    }

    /// Make `start_bot` fail with the given message.
    pub fn fail_start_bot(self, message: impl Into<String>) -> Self {
        *self.start_bot_failure.write() = Some(message.into());
        self
    }

    /// Get all captured calls.
    pub fn get_calls(&self) -> Vec<ProvisionCall> {
        self.captured_calls.read().clone()
    }

    /// Number of `create_room` calls made.
    pub fn create_room_count(&self) -> usize {
        self.captured_calls
            .read()
            .iter()
            .filter(|c| matches!(c, ProvisionCall::CreateRoom))
            .count()
    }

    /// `(url, token)` pairs passed to `start_bot`.
    pub fn start_bot_calls(&self) -> Vec<(String, String)> {
        self.captured_calls
            .read()
            .iter()
            .filter_map(|c| match c {
                ProvisionCall::StartBot { url, token } => Some((url.clone(), token.clone())),
                ProvisionCall::CreateRoom => None,
            })
            .collect()
    }

    /// Wait until `start_bot` has been called, up to `timeout`.
    ///
    /// Returns `false` if the timeout elapsed first.
    pub async fn wait_for_start_bot(&self, timeout: Duration) -> bool {
        if !self.start_bot_calls().is_empty() {
            return true;
        }
        tokio::time::timeout(timeout, self.bot_started.notified())
            .await
            .is_ok()
    }

    fn record_call(&self, call: ProvisionCall) {
        self.captured_calls.write().push(call);
    }
}

#[async_trait]
impl AgentProvisioner for MockProvisioner {
    async fn create_room(&self) -> ProvisioningOutcome {
        self.record_call(ProvisionCall::CreateRoom);
        let queued = self.outcomes.write().pop_front();
        queued.unwrap_or_else(|| self.default_outcome.read().clone())
    }

    async fn start_bot(&self, url: &str, token: &str) -> ProvisionResult<()> {
        self.record_call(ProvisionCall::StartBot {
            url: url.to_string(),
            token: token.to_string(),
        });
        self.bot_started.notify_one();

        if let Some(message) = self.start_bot_failure.read().clone() {
            return Err(ProvisionError::BotStart(message));
        }
        Ok(())
    }
}
