//! Startup configuration.
//!
//! The configuration is read once when the process starts and is treated as
//! immutable afterwards. Values come from `ROOMCALL_*` environment variables:
//!
//! | Variable | Meaning |
//! |---|---|
//! | `ROOMCALL_BASE_URL` | Base URL of the provisioning backend |
//! | `ROOMCALL_API_KEY` | Bearer token for the provisioning backend |
//! | `ROOMCALL_MANUAL_ROOM_ENTRY` | Force manual room entry even with a backend |
//! | `ROOMCALL_SHOW_CONFIG_OPTIONS` | Show the landing step |
//! | `ROOMCALL_OPEN_MIC` | Join with the microphone open |
//! | `ROOMCALL_TITLE` | Application title |
//! | `ROOMCALL_HELP_URL` | Link shown alongside capacity errors |
//! | `ROOMCALL_ROOM_DOMAIN` | Domain that room URLs must belong to |

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::resolver::{RoomResolver, DEFAULT_ROOM_DOMAIN};

pub const ENV_BASE_URL: &str = "ROOMCALL_BASE_URL";
pub const ENV_API_KEY: &str = "ROOMCALL_API_KEY";
pub const ENV_MANUAL_ROOM_ENTRY: &str = "ROOMCALL_MANUAL_ROOM_ENTRY";
pub const ENV_SHOW_CONFIG_OPTIONS: &str = "ROOMCALL_SHOW_CONFIG_OPTIONS";
pub const ENV_OPEN_MIC: &str = "ROOMCALL_OPEN_MIC";
pub const ENV_TITLE: &str = "ROOMCALL_TITLE";
pub const ENV_HELP_URL: &str = "ROOMCALL_HELP_URL";
pub const ENV_ROOM_DOMAIN: &str = "ROOMCALL_ROOM_DOMAIN";

const DEFAULT_TITLE: &str = "Agent Call";

/// Process-wide application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Provisioning backend base URL; `None` disables auto room creation
    pub base_url: Option<String>,
    /// Bearer token sent to the provisioning backend
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Force manual room entry even when a backend is configured
    pub manual_room_entry: bool,
    /// Show the landing (room entry) step
    pub show_config_options: bool,
    /// Join with the microphone open
    pub open_mic: bool,
    /// Application title
    pub title: String,
    /// External help link shown with capacity errors
    pub help_url: Option<String>,
    /// Domain room URLs must belong to
    pub room_domain: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            manual_room_entry: false,
            show_config_options: false,
            open_mic: false,
            title: DEFAULT_TITLE.to_string(),
            help_url: None,
            room_domain: DEFAULT_ROOM_DOMAIN.to_string(),
        }
    }
}

impl AppConfig {
    /// Read the configuration from `ROOMCALL_*` environment variables.
    pub fn from_env() -> CoreResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key/value source.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let config = Self {
            base_url: get(ENV_BASE_URL).map(|url| url.trim_end_matches('/').to_string()),
            api_key: get(ENV_API_KEY),
            manual_room_entry: parse_flag(ENV_MANUAL_ROOM_ENTRY, get(ENV_MANUAL_ROOM_ENTRY))?,
            show_config_options: parse_flag(ENV_SHOW_CONFIG_OPTIONS, get(ENV_SHOW_CONFIG_OPTIONS))?,
            open_mic: parse_flag(ENV_OPEN_MIC, get(ENV_OPEN_MIC))?,
            title: get(ENV_TITLE).unwrap_or(defaults.title),
            help_url: get(ENV_HELP_URL),
            room_domain: get(ENV_ROOM_DOMAIN).unwrap_or(defaults.room_domain),
        };

        debug!(
            base_url = ?config.base_url,
            manual_room_entry = config.manual_room_entry,
            show_config_options = config.show_config_options,
            "Loaded configuration"
        );

        Ok(config)
    }

    /// Whether a provisioning backend is configured.
    pub fn provisioning_available(&self) -> bool {
        self.base_url.is_some()
    }

    /// Whether rooms are created automatically by the backend.
    pub fn auto_room_creation(&self) -> bool {
        self.provisioning_available() && !self.manual_room_entry
    }

    /// Room resolver for the configured domain.
    pub fn resolver(&self) -> CoreResult<RoomResolver> {
        RoomResolver::new(&self.room_domain)
    }
}

fn parse_flag(key: &str, value: Option<String>) -> CoreResult<bool> {
    let Some(value) = value else {
        return Ok(false);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(CoreError::InvalidConfig {
            key: key.to_string(),
            value,
        }),
    }
}

/// Capability flags resolved once at startup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    /// A backend is configured and manual entry is not forced
    pub auto_room_creation: bool,
    /// A backend is configured at all
    pub provisioning_available: bool,
    /// Room URL supplied externally at startup
    pub manual_room_url_from_query: Option<String>,
    /// Whether the landing step is shown
    pub show_config_options: bool,
}

impl Capabilities {
    /// Resolve capabilities from the configuration and the optional
    /// externally supplied room URL.
    pub fn resolve(config: &AppConfig, query_room_url: Option<String>) -> Self {
        Self {
            auto_room_creation: config.auto_room_creation(),
            provisioning_available: config.provisioning_available(),
            manual_room_url_from_query: query_room_url.filter(|url| !url.is_empty()),
            show_config_options: config.show_config_options,
        }
    }
}
