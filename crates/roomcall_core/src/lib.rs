//! # roomcall_core
//!
//! Shared building blocks for roomcall:
//!
//! - **Session model**: [`SessionState`], [`RoomDescriptor`], [`SessionConfig`]
//! - **Startup configuration**: [`AppConfig`] read once from the environment,
//!   and the [`Capabilities`] derived from it
//! - **Room Resolver**: [`RoomResolver`] validates manually supplied room URLs
//!   and decides whether the landing step may proceed
//!
//! Nothing in this crate performs I/O beyond reading environment variables.

pub mod config;
pub mod error;
pub mod resolver;
pub mod types;

pub use config::{AppConfig, Capabilities};
pub use error::{CoreError, CoreResult};
pub use resolver::{RoomResolver, DEFAULT_ROOM_DOMAIN};
pub use types::{RoomDescriptor, SessionConfig, SessionState};
