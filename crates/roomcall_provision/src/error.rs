//! Error types for the provisioning client.

use thiserror::Error;

use crate::provisioner::ProvisioningOutcome;

/// Result type alias for provisioning operations.
pub type ProvisionResult<T> = Result<T, ProvisionError>;

/// Errors that can occur while talking to the provisioning backend.
#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Provisioning API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Provisioning backend refused request: {error}")]
    Backend {
        error: String,
        message: Option<String>,
    },

    #[error("Malformed provisioning response: {0}")]
    MalformedResponse(String),

    #[error("Bot start failed: {0}")]
    BotStart(String),
}

impl ProvisionError {
    /// Collapse the error into the outcome reported to the orchestrator.
    ///
    /// Only a structured refusal from the backend counts as a capacity
    /// problem; everything else is a transport failure.
    pub fn outcome(&self) -> ProvisioningOutcome {
        match self {
            Self::Backend { .. } => ProvisioningOutcome::CapacityExceeded,
            _ => ProvisioningOutcome::TransportFailure,
        }
    }
}
