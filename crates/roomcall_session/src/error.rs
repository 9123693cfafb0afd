//! Error types for the orchestrator.

use thiserror::Error;

use roomcall_core::{CoreError, SessionState};

/// Result type alias for orchestrator operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors returned by orchestrator triggers.
///
/// Provisioning and join failures are never reported here; they become
/// session state and a user-facing message instead.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Cannot {trigger} while {from}")]
    InvalidTransition { from: SessionState, trigger: String },

    #[error("Auto room creation is enabled but no provisioner was supplied")]
    MissingProvisioner,

    #[error(transparent)]
    Core(#[from] CoreError),
}
