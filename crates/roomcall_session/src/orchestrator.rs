//! Session-establishment orchestrator.
//!
//! A state machine that moves a user from room selection to a live call:
//!
//! | From | Trigger | To |
//! |---|---|---|
//! | idle | [`confirm_room`](Orchestrator::confirm_room) | configuring, or idle with the validation flag set |
//! | configuring | [`start_session`](Orchestrator::start_session) | requesting_agent (backend configured) or connecting |
//! | requesting_agent | room created / refused | connecting / configuring |
//! | connecting | join settles | connected / error |
//! | connected | [`leave`](Orchestrator::leave) | idle or configuring |
//! | error | [`restart`](Orchestrator::restart) | idle or configuring |
//!
//! Triggers take `&mut self`, so only one transition is ever in flight.
//! Provisioning and join failures never escape as errors; they become state
//! plus a message in the [`SessionView`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use roomcall_core::{AppConfig, Capabilities, RoomDescriptor, RoomResolver, SessionConfig, SessionState};
use roomcall_provision::{AgentProvisioner, ProvisioningOutcome};

use crate::call::{CallClient, JoinParams};
use crate::error::{SessionError, SessionResult};
use crate::timeline::TransitionEvent;

/// Message shown when the backend cannot provide a room.
///
/// Shown for both capacity and transport failures.
pub const CAPACITY_MESSAGE: &str =
    "All agents are busy right now. Please wait a moment and try again.";

/// Maximum number of transitions kept in the timeline.
pub const TIMELINE_CAPACITY: usize = 256;

/// Snapshot of everything a front end needs to render the current step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub title: String,
    pub state: SessionState,
    /// A suspending operation is outstanding; disable the triggering control
    pub busy: bool,
    /// Whether "proceed" on the landing step is enabled
    pub can_proceed: bool,
    /// Room being joined or in use
    pub room_url: Option<String>,
    pub validation_error: bool,
    /// Capacity or provisioning notice shown on the configuration step
    pub notice: Option<String>,
    pub help_url: Option<String>,
    /// Join failure shown on the error view
    pub error_message: Option<String>,
}

/// Drives the session lifecycle.
pub struct Orchestrator {
    config: Arc<AppConfig>,
    capabilities: Capabilities,
    resolver: RoomResolver,
    provisioner: Option<Arc<dyn AgentProvisioner>>,
    call: Arc<dyn CallClient>,
    state: SessionState,
    candidate: Option<String>,
    room: RoomDescriptor,
    validation_error: bool,
    notice: Option<String>,
    error_message: Option<String>,
    timeline: Vec<TransitionEvent>,
}

impl Orchestrator {
    /// Create an orchestrator in its start state.
    ///
    /// `provisioner` is required whenever a provisioning backend is
    /// available, even with manual room entry forced. A room URL supplied
    /// at startup becomes the initial candidate.
    pub fn new(
        config: Arc<AppConfig>,
        capabilities: Capabilities,
        provisioner: Option<Arc<dyn AgentProvisioner>>,
        call: Arc<dyn CallClient>,
    ) -> SessionResult<Self> {
        if capabilities.provisioning_available && provisioner.is_none() {
            return Err(SessionError::MissingProvisioner);
        }

        let resolver = config.resolver()?;
        let state = start_state(&capabilities);
        let candidate = capabilities.manual_room_url_from_query.clone();

        info!(
            state = %state,
            auto_room_creation = capabilities.auto_room_creation,
            provisioning_available = capabilities.provisioning_available,
            has_query_room = candidate.is_some(),
            "Orchestrator ready"
        );

        Ok(Self {
            config,
            capabilities,
            resolver,
            provisioner,
            call,
            state,
            candidate,
            room: RoomDescriptor::default(),
            validation_error: false,
            notice: None,
            error_message: None,
            timeline: Vec::new(),
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Room currently held by the orchestrator.
    pub fn room(&self) -> &RoomDescriptor {
        &self.room
    }

    /// Recent transitions, oldest first.
    ///
    /// Holds at most [`TIMELINE_CAPACITY`] events; once full, the oldest
    /// event is dropped for each new transition.
    pub fn timeline(&self) -> &[TransitionEvent] {
        &self.timeline
    }

    /// Whether the landing step's "proceed" action is enabled.
    pub fn can_proceed(&self) -> bool {
        self.resolver
            .can_proceed(&self.capabilities, self.candidate.as_deref())
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            title: self.config.title.clone(),
            state: self.state,
            busy: self.state.is_busy(),
            can_proceed: self.can_proceed(),
            room_url: self.room.url.clone(),
            validation_error: self.validation_error,
            notice: self.notice.clone(),
            help_url: self.notice.as_ref().and(self.config.help_url.clone()),
            error_message: self.error_message.clone(),
        }
    }

    /// Set the manually entered room URL on the landing step.
    pub fn set_room_url(&mut self, candidate: impl Into<String>) -> SessionResult<()> {
        self.require(SessionState::Idle, "set room url")?;
        let candidate = candidate.into();
        self.candidate = (!candidate.is_empty()).then_some(candidate);
        Ok(())
    }

    /// Confirm the room choice on the landing step.
    ///
    /// Moves to `configuring` when rooms are created automatically or the
    /// candidate is a valid room URL. Otherwise sets the validation flag
    /// and stays in `idle`.
    pub fn confirm_room(&mut self) -> SessionResult<SessionState> {
        self.require(SessionState::Idle, "confirm room")?;

        if !self.can_proceed() {
            warn!(candidate = ?self.candidate, "Room URL rejected");
            self.validation_error = true;
            return Ok(self.state);
        }

        self.validation_error = false;
        if !self.capabilities.auto_room_creation {
            if let Some(url) = &self.candidate {
                self.room = RoomDescriptor::manual(url.clone());
            }
        }
        self.transition(SessionState::Configuring, "confirm_room");
        Ok(self.state)
    }

    /// Start the session from the configuration step.
    ///
    /// Whenever a provisioning backend is available it is asked for a room
    /// first and the provisioned room replaces any manual choice; otherwise
    /// the manual room is joined directly. Returns the state the
    /// orchestrator settled in.
    pub async fn start_session(&mut self, session_config: SessionConfig) -> SessionResult<SessionState> {
        self.require(SessionState::Configuring, "start session")?;
        self.notice = None;

        if self.capabilities.provisioning_available {
            let provisioner = self
                .provisioner
                .clone()
                .ok_or(SessionError::MissingProvisioner)?;
            self.transition(SessionState::RequestingAgent, "start_session");

            match provisioner.create_room().await {
                ProvisioningOutcome::Success { url, token } => {
                    self.room = RoomDescriptor::provisioned(url.clone(), token.clone());
                    self.transition(SessionState::Connecting, "room_created");
                    spawn_start_bot(provisioner, url, token);
                }
                outcome => {
                    warn!(outcome = ?outcome, "No room available");
                    self.notice = Some(CAPACITY_MESSAGE.to_string());
                    self.transition(SessionState::Configuring, "room_unavailable");
                    return Ok(self.state);
                }
            }
        } else {
            if !self.room.has_url() {
                // Landing step was skipped; the startup room must validate here.
                match self.resolver.check(self.candidate.as_deref()) {
                    Ok(url) => self.room = RoomDescriptor::manual(url),
                    Err(e) => {
                        warn!(error = %e, "No valid room to join");
                        self.validation_error = true;
                        return Ok(self.state);
                    }
                }
            }
            self.validation_error = false;
            self.transition(SessionState::Connecting, "start_session");
        }

        self.join(session_config).await;
        Ok(self.state)
    }

    /// Leave the live session and return to the start state.
    pub async fn leave(&mut self) -> SessionResult<SessionState> {
        self.require(SessionState::Connected, "leave")?;
        self.release().await;
        self.transition(start_state(&self.capabilities), "leave");
        Ok(self.state)
    }

    /// Return to the start state after a failed join.
    ///
    /// Only ever called on an explicit user request.
    pub async fn restart(&mut self) -> SessionResult<SessionState> {
        self.require(SessionState::Error, "restart")?;
        self.release().await;
        self.error_message = None;
        self.transition(start_state(&self.capabilities), "restart");
        Ok(self.state)
    }

    async fn join(&mut self, session_config: SessionConfig) {
        let Some(url) = self.room.url.clone() else {
            // Unreachable through the public triggers; never join without a URL.
            error!("Join attempted without a room URL");
            self.error_message = Some("No room URL available".to_string());
            self.transition(SessionState::Error, "join_failed");
            return;
        };

        let params = JoinParams::new(url.clone(), self.room.token.clone(), session_config.start_audio_off);
        debug!(room_url = %url, start_audio_off = params.start_audio_off, "Joining room");

        match self.call.join(params).await {
            Ok(()) => {
                self.transition(SessionState::Connected, "joined");
            }
            Err(e) => {
                error!(room_url = %url, error = %e, "Failed to join room");
                self.error_message = Some(format!("Unable to connect to room {}", url));
                self.transition(SessionState::Error, "join_failed");
            }
        }
    }

    /// Leave and destroy the call client. Both always run; failures are
    /// logged and tolerated.
    async fn release(&mut self) {
        if let Err(e) = self.call.leave().await {
            warn!(error = %e, "Leave failed");
        }
        if let Err(e) = self.call.destroy().await {
            warn!(error = %e, "Destroy failed");
        }
        self.room = RoomDescriptor::default();
        self.notice = None;
        self.validation_error = false;
    }

    fn require(&self, expected: SessionState, trigger: &str) -> SessionResult<()> {
        if self.state != expected {
            return Err(SessionError::InvalidTransition {
                from: self.state,
                trigger: trigger.to_string(),
            });
        }
        Ok(())
    }

    fn transition(&mut self, to: SessionState, trigger: &str) {
        let from = self.state;
        self.state = to;

        let message = match to {
            SessionState::Error => self.error_message.clone(),
            SessionState::Configuring => self.notice.clone(),
            _ => None,
        };
        info!(from = %from, to = %to, trigger, "Session transition");
        if self.timeline.len() == TIMELINE_CAPACITY {
            self.timeline.remove(0);
        }
        self.timeline
            .push(TransitionEvent::new(from, to, trigger).with_message(message));
    }
}

fn start_state(capabilities: &Capabilities) -> SessionState {
    if capabilities.show_config_options {
        SessionState::Idle
    } else {
        SessionState::Configuring
    }
}

/// Ask the backend to start an agent without waiting for it.
///
/// The task races the join and is never awaited; its failure is logged only.
fn spawn_start_bot(provisioner: Arc<dyn AgentProvisioner>, url: String, token: String) {
    drop(tokio::spawn(async move {
        if let Err(e) = provisioner.start_bot(&url, &token).await {
            warn!(room_url = %url, error = %e, "Agent did not start");
        }
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call::{CallError, MockCallClient};
    use roomcall_provision::MockProvisioner;

    const ROOM: &str = "https://foo.example-provider.com/room1";

    fn manual_caps(show_config_options: bool) -> Capabilities {
        Capabilities {
            auto_room_creation: false,
            provisioning_available: false,
            manual_room_url_from_query: None,
            show_config_options,
        }
    }

    fn orchestrator(caps: Capabilities, call: MockCallClient) -> Orchestrator {
        let provisioner: Option<Arc<dyn AgentProvisioner>> = caps
            .provisioning_available
            .then(|| Arc::new(MockProvisioner::new()) as Arc<dyn AgentProvisioner>);
        Orchestrator::new(Arc::new(AppConfig::default()), caps, provisioner, Arc::new(call)).unwrap()
    }

    #[tokio::test]
    async fn test_leave_and_destroy_called_exactly_once() {
        let mut call = MockCallClient::new();
        call.expect_join().times(1).returning(|_| Ok(()));
        call.expect_leave().times(1).returning(|| Ok(()));
        call.expect_destroy().times(1).returning(|| Ok(()));

        let mut orch = orchestrator(manual_caps(true), call);
        orch.set_room_url(ROOM).unwrap();
        orch.confirm_room().unwrap();
        orch.start_session(SessionConfig::default()).await.unwrap();
        assert_eq!(orch.state(), SessionState::Connected);

        assert_eq!(orch.leave().await.unwrap(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_leave_tolerates_release_failures() {
        let mut call = MockCallClient::new();
        call.expect_join().returning(|_| Ok(()));
        call.expect_leave()
            .times(1)
            .returning(|| Err(CallError::Leave("not in a call".to_string())));
        call.expect_destroy()
            .times(1)
            .returning(|| Err(CallError::Destroy("already destroyed".to_string())));

        let caps = Capabilities {
            manual_room_url_from_query: Some(ROOM.to_string()),
            ..manual_caps(false)
        };
        let mut orch = orchestrator(caps, call);
        orch.start_session(SessionConfig::default()).await.unwrap();

        assert_eq!(orch.leave().await.unwrap(), SessionState::Configuring);
        assert!(orch.room().url.is_none());
    }

    #[tokio::test]
    async fn test_join_receives_manual_room_without_token() {
        let mut call = MockCallClient::new();
        call.expect_join()
            .withf(|p| p.url == ROOM && p.token.is_none() && !p.video_source && p.start_audio_off)
            .times(1)
            .returning(|_| Ok(()));

        let mut orch = orchestrator(manual_caps(true), call);
        orch.set_room_url(ROOM).unwrap();
        orch.confirm_room().unwrap();
        orch.start_session(SessionConfig::new(true)).await.unwrap();
        assert_eq!(orch.state(), SessionState::Connected);
    }

    #[tokio::test]
    async fn test_invalid_triggers_change_nothing() {
        let mut orch = orchestrator(manual_caps(true), MockCallClient::new());

        let err = orch.leave().await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidTransition { from: SessionState::Idle, .. }
        ));
        assert!(orch.start_session(SessionConfig::default()).await.is_err());
        assert!(orch.restart().await.is_err());
        assert_eq!(orch.state(), SessionState::Idle);
        assert!(orch.timeline().is_empty());
    }

    #[tokio::test]
    async fn test_missing_room_never_joins() {
        // No expectations: any call on the client fails the test.
        let mut orch = orchestrator(manual_caps(false), MockCallClient::new());

        let state = orch.start_session(SessionConfig::default()).await.unwrap();
        assert_eq!(state, SessionState::Configuring);
        assert!(orch.view().validation_error);
    }

    #[test]
    fn test_auto_creation_requires_provisioner() {
        let caps = Capabilities {
            auto_room_creation: true,
            provisioning_available: true,
            manual_room_url_from_query: None,
            show_config_options: false,
        };
        let result = Orchestrator::new(
            Arc::new(AppConfig::default()),
            caps,
            None,
            Arc::new(MockCallClient::new()),
        );
        assert!(matches!(result, Err(SessionError::MissingProvisioner)));
    }

    #[test]
    fn test_forced_manual_with_backend_requires_provisioner() {
        let caps = Capabilities {
            provisioning_available: true,
            ..manual_caps(true)
        };
        let result = Orchestrator::new(
            Arc::new(AppConfig::default()),
            caps,
            None,
            Arc::new(MockCallClient::new()),
        );
        assert!(matches!(result, Err(SessionError::MissingProvisioner)));
    }
}
