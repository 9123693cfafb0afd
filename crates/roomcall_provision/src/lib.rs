//! # roomcall_provision
//!
//! Client for the provisioning backend that creates rooms and starts agents.
//!
//! The backend exposes two JSON endpoints, both authenticated with a bearer
//! token:
//!
//! - `POST <base>/create_room` returns `{ "result": { "url", "token" } }`, or
//!   `{ "error": ..., "detail": { "message" } }` when it cannot serve the
//!   request.
//! - `POST <base>/start_bot` asks the backend to send an agent into a room.
//!
//! Room creation never returns an error to the caller. Every failure is
//! folded into a [`ProvisioningOutcome`], and the details only reach the logs.
//!
//! # Example
//!
//! ```rust,no_run
//! use roomcall_provision::{AgentProvisioner, ProvisioningClient, ProvisioningOutcome};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = ProvisioningClient::new("http://localhost:7860", Some("secret".to_string()));
//!
//!     match client.create_room().await {
//!         ProvisioningOutcome::Success { url, token } => {
//!             let _ = client.start_bot(&url, &token).await;
//!         }
//!         other => eprintln!("no room: {:?}", other),
//!     }
//! }
//! ```

pub mod client;
pub mod error;
pub mod mock;
pub mod provisioner;

pub use client::ProvisioningClient;
pub use error::{ProvisionError, ProvisionResult};
pub use mock::{MockProvisioner, ProvisionCall};
pub use provisioner::{AgentProvisioner, ProvisioningOutcome};
