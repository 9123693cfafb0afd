//! Session command - Run a session lifecycle end to end.
//!
//! The real-time transport is replaced by a dry-run client, so this command
//! exercises provisioning and the orchestrator without joining any media.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use roomcall_core::{Capabilities, SessionConfig, SessionState};
use roomcall_provision::{AgentProvisioner, ProvisioningClient};
use roomcall_session::{DryRunCallClient, Orchestrator};

use super::{CommandFailure, ConfigArgs};

#[derive(Args)]
pub struct SessionArgs {
    /// Room to join instead of creating one
    #[arg(long)]
    room_url: Option<String>,

    /// Join with the microphone muted
    #[arg(long)]
    audio_off: bool,

    /// Leave after this many seconds instead of waiting for Ctrl-C
    #[arg(long)]
    hold_secs: Option<u64>,

    /// Print the final session view as JSON
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    config: ConfigArgs,
}

pub async fn execute(args: SessionArgs) -> Result<()> {
    let config = Arc::new(args.config.load()?);
    let capabilities = Capabilities::resolve(&config, args.room_url.clone());

    let provisioner = ProvisioningClient::from_config(&config)
        .map(|c| Arc::new(c) as Arc<dyn AgentProvisioner>);
    let call = Arc::new(DryRunCallClient::new());

    let mut orchestrator = Orchestrator::new(config.clone(), capabilities, provisioner, call)
        .context("Failed to set up session")?;

    println!("🎙️  {}", config.title);

    if orchestrator.state() == SessionState::Idle {
        orchestrator.confirm_room()?;
        if orchestrator.state() == SessionState::Idle {
            return Err(CommandFailure::Validation(match &args.room_url {
                Some(url) if !orchestrator.capabilities().provisioning_available => format!(
                    "Room URL {} cannot be confirmed on the landing step without a provisioning backend",
                    url
                ),
                Some(url) => format!("Invalid room URL: {}", url),
                None => "A room URL is required (--room-url) when no provisioning backend is configured".to_string(),
            })
            .into());
        }
    }

    let session_config = if args.audio_off {
        SessionConfig::new(true)
    } else {
        SessionConfig::from_app(&config)
    };

    let state = orchestrator.start_session(session_config).await?;
    let view = orchestrator.view();

    match state {
        SessionState::Connected => {
            println!(
                "✅ Connected to {}",
                view.room_url.as_deref().unwrap_or("<unknown room>")
            );
            hold(args.hold_secs).await?;
            orchestrator.leave().await?;
            println!("👋 Left the session");
        }
        SessionState::Configuring if view.validation_error => {
            return Err(CommandFailure::Validation("No valid room URL to join".to_string()).into());
        }
        SessionState::Configuring => {
            let mut message = view.notice.unwrap_or_default();
            if let Some(help) = view.help_url {
                message = format!("{} (see {})", message, help);
            }
            return Err(CommandFailure::Provisioning(message).into());
        }
        SessionState::Error => {
            return Err(CommandFailure::Join(view.error_message.unwrap_or_default()).into());
        }
        other => anyhow::bail!("Session stopped in unexpected state: {}", other),
    }

    for event in orchestrator.timeline() {
        info!(from = %event.from, to = %event.to, trigger = %event.trigger, at = %event.ts, "Timeline");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&orchestrator.view())?);
    }

    Ok(())
}

async fn hold(seconds: Option<u64>) -> Result<()> {
    match seconds {
        Some(secs) => {
            println!("   Holding for {}s", secs);
            tokio::time::sleep(Duration::from_secs(secs)).await;
        }
        None => {
            println!("   Press Ctrl-C to leave");
            tokio::signal::ctrl_c()
                .await
                .context("Failed to listen for Ctrl-C")?;
        }
    }
    Ok(())
}
