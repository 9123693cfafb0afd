//! Core types for the session lifecycle.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

/// Lifecycle state of a call session.
///
/// Contains exactly the states the orchestrator can reach.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Landing step: the user chooses or enters a room
    Idle,
    /// Device configuration step, ready to start a session
    Configuring,
    /// Waiting for the provisioning backend to create a room
    RequestingAgent,
    /// Joining the room through the call client
    Connecting,
    /// In a live session
    Connected,
    /// Joining failed; terminal for this run
    Error,
}

impl SessionState {
    /// Label used in logs and serialized views.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Configuring => "configuring",
            Self::RequestingAgent => "requesting_agent",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Error => "error",
        }
    }

    /// Whether a suspending operation is outstanding in this state.
    ///
    /// Front ends disable the triggering control while this is true.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::RequestingAgent | Self::Connecting)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address and credentials of a room.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomDescriptor {
    /// Room URL, forwarded to the call client unchanged
    pub url: Option<String>,
    /// Meeting token; absent for manually entered rooms
    pub token: Option<String>,
}

impl RoomDescriptor {
    /// Descriptor returned by the provisioning backend.
    pub fn provisioned(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            token: Some(token.into()),
        }
    }

    /// Descriptor for a room the user supplied, without a token.
    pub fn manual(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            token: None,
        }
    }

    pub fn has_url(&self) -> bool {
        self.url.is_some()
    }
}

/// Options collected by the device-configuration step.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// Join with the microphone muted
    pub start_audio_off: bool,
}

impl SessionConfig {
    pub fn new(start_audio_off: bool) -> Self {
        Self { start_audio_off }
    }

    /// Default options for an application: an open mic joins unmuted.
    pub fn from_app(config: &AppConfig) -> Self {
        Self {
            start_audio_off: !config.open_mic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_labels_match_serde() {
        for state in [
            SessionState::Idle,
            SessionState::Configuring,
            SessionState::RequestingAgent,
            SessionState::Connecting,
            SessionState::Connected,
            SessionState::Error,
        ] {
            let json = serde_json::to_string(&state).unwrap();
            assert_eq!(json, format!("\"{}\"", state));
        }
    }

    #[test]
    fn test_busy_states() {
        assert!(SessionState::RequestingAgent.is_busy());
        assert!(SessionState::Connecting.is_busy());
        assert!(!SessionState::Idle.is_busy());
        assert!(!SessionState::Connected.is_busy());
    }

    #[test]
    fn test_session_config_from_open_mic() {
        let mut config = AppConfig::default();
        config.open_mic = true;
        assert!(!SessionConfig::from_app(&config).start_audio_off);

        config.open_mic = false;
        assert!(SessionConfig::from_app(&config).start_audio_off);
    }

    #[test]
    fn test_manual_descriptor_has_no_token() {
        let room = RoomDescriptor::manual("https://foo.example-provider.com/room1");
        assert!(room.has_url());
        assert!(room.token.is_none());
        assert!(!RoomDescriptor::default().has_url());
    }
}
