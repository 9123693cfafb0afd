//! Provisioner trait and outcome types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use roomcall_core::RoomDescriptor;

use crate::error::ProvisionResult;

/// Result of asking the backend for a room.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProvisioningOutcome {
    /// A room was created
    Success { url: String, token: String },
    /// The backend refused the request, usually because it is at capacity
    CapacityExceeded,
    /// The request failed in transit or the response was unusable
    TransportFailure,
}

impl ProvisioningOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Room descriptor for a successful outcome.
    pub fn room(&self) -> Option<RoomDescriptor> {
        match self {
            Self::Success { url, token } => Some(RoomDescriptor::provisioned(url.clone(), token.clone())),
            _ => None,
        }
    }
}

/// Agent provisioning backend.
#[async_trait]
pub trait AgentProvisioner: Send + Sync {
    /// Create a room. Never fails; failures are folded into the outcome.
    async fn create_room(&self) -> ProvisioningOutcome;

    /// Ask the backend to start an agent in the room.
    async fn start_bot(&self, url: &str, token: &str) -> ProvisionResult<()>;
}
