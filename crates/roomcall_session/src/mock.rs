//! Recording call client for testing.
//!
//! Captures every call and returns configurable results, so orchestrator
//! behavior can be verified without a real-time transport.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::call::{CallClient, CallError, CallResult, JoinParams};

/// Captured call information for verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallRecord {
    Join(JoinParams),
    Leave,
    Destroy,
}

/// Call client double that records calls.
#[derive(Clone, Default)]
pub struct RecordingCallClient {
    join_failure: Arc<RwLock<Option<String>>>,
    leave_failure: Arc<RwLock<Option<String>>>,
    captured_calls: Arc<RwLock<Vec<CallRecord>>>,
    active: Arc<RwLock<bool>>,
}

impl RecordingCallClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `join` fail with the given message.
    pub fn fail_join(self, message: impl Into<String>) -> Self {
        *self.join_failure.write() = Some(message.into());
        self
    }

    /// Make every `leave` fail with the given message.
    pub fn fail_leave(self, message: impl Into<String>) -> Self {
        *self.leave_failure.write() = Some(message.into());
        self
    }

    /// Get all captured calls.
    pub fn get_calls(&self) -> Vec<CallRecord> {
        self.captured_calls.read().clone()
    }

    /// Parameters of every `join` call.
    pub fn joins(&self) -> Vec<JoinParams> {
        self.captured_calls
            .read()
            .iter()
            .filter_map(|c| match c {
                CallRecord::Join(params) => Some(params.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn leave_count(&self) -> usize {
        self.count(&CallRecord::Leave)
    }

    pub fn destroy_count(&self) -> usize {
        self.count(&CallRecord::Destroy)
    }

    /// Whether a joined session has not been left yet.
    pub fn is_active(&self) -> bool {
        *self.active.read()
    }

    /// Clear all captured calls.
    pub fn clear_calls(&self) {
        self.captured_calls.write().clear();
    }

    fn count(&self, record: &CallRecord) -> usize {
        self.captured_calls.read().iter().filter(|c| *c == record).count()
    }

    fn record_call(&self, call: CallRecord) {
        self.captured_calls.write().push(call);
    }
}

#[async_trait]
impl CallClient for RecordingCallClient {
    async fn join(&self, params: JoinParams) -> CallResult<()> {
        self.record_call(CallRecord::Join(params));
        if let Some(message) = self.join_failure.read().clone() {
            return Err(CallError::Join(message));
        }
        *self.active.write() = true;
        Ok(())
    }

    async fn leave(&self) -> CallResult<()> {
        self.record_call(CallRecord::Leave);
        *self.active.write() = false;
        if let Some(message) = self.leave_failure.read().clone() {
            return Err(CallError::Leave(message));
        }
        Ok(())
    }

    async fn destroy(&self) -> CallResult<()> {
        self.record_call(CallRecord::Destroy);
        *self.active.write() = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_session_lifecycle() {
        let client = RecordingCallClient::new();
        let params = JoinParams::new("https://foo.example-provider.com/room1", None, true);

        client.join(params.clone()).await.unwrap();
        assert!(client.is_active());

        client.leave().await.unwrap();
        client.destroy().await.unwrap();
        assert!(!client.is_active());

        assert_eq!(
            client.get_calls(),
            vec![CallRecord::Join(params), CallRecord::Leave, CallRecord::Destroy]
        );
    }

    #[tokio::test]
    async fn test_join_failure() {
        let client = RecordingCallClient::new().fail_join("room not found");
        let result = client
            .join(JoinParams::new("https://foo.example-provider.com/room1", None, false))
            .await;

        assert_eq!(result, Err(CallError::Join("room not found".to_string())));
        assert!(!client.is_active());
        assert_eq!(client.joins().len(), 1);
    }
}
