//! # roomcall_session - Session-establishment orchestrator
//!
//! Drives a user from room selection to a live call with a remote agent:
//!
//! ```text
//!   idle ──confirm──▶ configuring ──start──▶ requesting_agent ──room──▶ connecting ──join──▶ connected
//!    ▲                  ▲    │                      │                       │                   │
//!    │                  │    └──(manual room)───────┼──────────────────────▶│                   │
//!    │                  └──── capacity / transport ─┘                       ▼                   │
//!    │                                                                    error                 │
//!    └──────────────────────────────────── leave ───────────────────────────────────────────────┘
//! ```
//!
//! The real-time transport is reached only through the [`CallClient`] trait.
//! Room provisioning goes through
//! [`AgentProvisioner`](roomcall_provision::AgentProvisioner).

pub mod call;
pub mod dry_run;
pub mod error;
pub mod mock;
pub mod orchestrator;
pub mod timeline;

pub use call::{CallClient, CallError, CallResult, JoinParams};
pub use dry_run::DryRunCallClient;
pub use error::{SessionError, SessionResult};
pub use mock::{CallRecord, RecordingCallClient};
pub use orchestrator::{Orchestrator, SessionView, CAPACITY_MESSAGE, TIMELINE_CAPACITY};
pub use timeline::TransitionEvent;
