//! CLI command definitions.
//!
//! Each subcommand exercises one part of the session flow against the
//! configured provisioning backend.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use roomcall_core::AppConfig;

pub mod create_room;
pub mod session;
pub mod validate;

/// roomcall - join real-time audio sessions with a remote agent
#[derive(Parser)]
#[command(name = "roomcall")]
#[command(version, about = "roomcall - join real-time audio sessions with a remote agent")]
#[command(long_about = r#"
roomcall provisions a room with an agent through a provisioning backend and
walks the session through joining and leaving it.

COMMANDS:
  validate     → Check a room URL against the configured provider domain
  create-room  → Ask the provisioning backend for a room
  session      → Run a full session lifecycle (dry-run transport)

CONFIGURATION (environment):
  ROOMCALL_BASE_URL, ROOMCALL_API_KEY, ROOMCALL_MANUAL_ROOM_ENTRY,
  ROOMCALL_SHOW_CONFIG_OPTIONS, ROOMCALL_OPEN_MIC, ROOMCALL_TITLE,
  ROOMCALL_HELP_URL, ROOMCALL_ROOM_DOMAIN

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments or configuration
  3 - Validation failure
  4 - Provisioning failure
  5 - Join failure
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a room URL
    Validate(validate::ValidateArgs),

    /// Create a room through the provisioning backend
    #[command(name = "create-room")]
    CreateRoom(create_room::CreateRoomArgs),

    /// Run a session from room selection to leave
    Session(session::SessionArgs),
}

/// Failures that map to dedicated exit codes.
#[derive(Error, Debug)]
pub enum CommandFailure {
    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Provisioning(String),

    #[error("{0}")]
    Join(String),
}

/// Overrides layered on top of the environment configuration.
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Provisioning backend base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Provisioning backend API key
    #[arg(long)]
    pub api_key: Option<String>,

    /// Domain room URLs must belong to
    #[arg(long)]
    pub room_domain: Option<String>,
}

impl ConfigArgs {
    /// Read the environment once and apply command-line overrides.
    pub fn load(&self) -> Result<AppConfig> {
        let mut config = AppConfig::from_env()?;
        if let Some(base_url) = &self.base_url {
            config.base_url = Some(base_url.trim_end_matches('/').to_string());
        }
        if let Some(api_key) = &self.api_key {
            config.api_key = Some(api_key.clone());
        }
        if let Some(domain) = &self.room_domain {
            config.room_domain = domain.clone();
        }
        Ok(config)
    }
}
