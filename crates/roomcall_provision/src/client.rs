//! HTTP client for the provisioning backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use roomcall_core::AppConfig;

use crate::error::{ProvisionError, ProvisionResult};
use crate::provisioner::{AgentProvisioner, ProvisioningOutcome};

const CREATE_ROOM_PATH: &str = "create_room";
const START_BOT_PATH: &str = "start_bot";

/// Provisioning backend client.
///
/// Makes a single attempt per call. There are no retries and no client-side
/// timeout; a failed attempt is reported and the user decides whether to
/// try again.
pub struct ProvisioningClient {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl ProvisioningClient {
    /// Create a client for the given backend.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if api_key.is_none() {
            warn!(base_url = %base_url, "Provisioning client has no API key; requests are unauthenticated");
        }

        Self {
            base_url,
            api_key,
            client: reqwest::Client::new(),
        }
    }

    /// Create a client from the startup configuration.
    ///
    /// Returns `None` when no backend is configured.
    pub fn from_config(config: &AppConfig) -> Option<Self> {
        config
            .base_url
            .as_ref()
            .map(|url| Self::new(url.clone(), config.api_key.clone()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        let request = self
            .client
            .post(self.endpoint(path))
            .header("Content-Type", "application/json");
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn request_room(&self) -> ProvisionResult<CreatedRoom> {
        let response = self
            .post(CREATE_ROOM_PATH)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let parsed = serde_json::from_str::<ApiResponse>(&body);

        // A structured refusal wins over the status code.
        if let Ok(ApiResponse {
            error: Some(error),
            detail,
            ..
        }) = &parsed
        {
            return Err(ProvisionError::Backend {
                error: describe(error),
                message: detail.as_ref().and_then(|d| d.message.clone()),
            });
        }

        if !status.is_success() {
            return Err(ProvisionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parsed
            .map_err(|e| ProvisionError::MalformedResponse(e.to_string()))?
            .result
            .ok_or_else(|| ProvisionError::MalformedResponse("missing result".to_string()))
    }
}

#[async_trait]
impl AgentProvisioner for ProvisioningClient {
    async fn create_room(&self) -> ProvisioningOutcome {
        debug!(endpoint = %self.endpoint(CREATE_ROOM_PATH), "Requesting room");

        match self.request_room().await {
            Ok(room) => {
                info!(room_url = %room.url, "Room created");
                ProvisioningOutcome::Success {
                    url: room.url,
                    token: room.token,
                }
            }
            Err(e) => {
                let outcome = e.outcome();
                warn!(error = %e, outcome = ?outcome, "Room creation failed");
                outcome
            }
        }
    }

    async fn start_bot(&self, url: &str, token: &str) -> ProvisionResult<()> {
        debug!(room_url = %url, "Starting bot");

        let request = StartBotRequest {
            room_url: url,
            token,
        };
        let response = self.post(START_BOT_PATH).json(&request).send().await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if let Ok(ApiResponse {
            error: Some(error),
            detail,
            ..
        }) = serde_json::from_str::<ApiResponse>(&body)
        {
            let message = detail.and_then(|d| d.message);
            return Err(ProvisionError::BotStart(match message {
                Some(message) => format!("{}: {}", describe(&error), message),
                None => describe(&error),
            }));
        }

        if !status.is_success() {
            return Err(ProvisionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        info!(room_url = %url, "Bot started");
        Ok(())
    }
}

fn describe(error: &serde_json::Value) -> String {
    match error {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// Provisioning API types
#[derive(Debug, Deserialize)]
struct ApiResponse {
    result: Option<CreatedRoom>,
    error: Option<serde_json::Value>,
    detail: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct CreatedRoom {
    url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct StartBotRequest<'a> {
    room_url: &'a str,
    token: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = ProvisioningClient::new("http://localhost:7860/api/", None);
        assert_eq!(client.base_url(), "http://localhost:7860/api");
        assert_eq!(client.endpoint(CREATE_ROOM_PATH), "http://localhost:7860/api/create_room");
    }

    #[test]
    fn test_from_config_requires_base_url() {
        let mut config = AppConfig::default();
        assert!(ProvisioningClient::from_config(&config).is_none());

        config.base_url = Some("http://localhost:7860".to_string());
        config.api_key = Some("key".to_string());
        let client = ProvisioningClient::from_config(&config).unwrap();
        assert_eq!(client.endpoint(START_BOT_PATH), "http://localhost:7860/start_bot");
    }

    #[test]
    fn test_error_field_parsing() {
        let parsed: ApiResponse =
            serde_json::from_str(r#"{"error":"capacity","detail":{"message":"All bots busy"}}"#).unwrap();
        assert_eq!(describe(parsed.error.as_ref().unwrap()), "capacity");
        assert_eq!(parsed.detail.unwrap().message.as_deref(), Some("All bots busy"));

        let parsed: ApiResponse = serde_json::from_str(r#"{"error":{"code":503}}"#).unwrap();
        assert_eq!(describe(parsed.error.as_ref().unwrap()), r#"{"code":503}"#);
    }

    #[test]
    fn test_null_error_is_absent() {
        let parsed: ApiResponse =
            serde_json::from_str(r#"{"result":{"url":"https://a.example-provider.com/r","token":"t"},"error":null}"#)
                .unwrap();
        assert!(parsed.error.is_none());
        assert_eq!(parsed.result.unwrap().token, "t");
    }
}
