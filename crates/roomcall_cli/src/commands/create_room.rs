//! Create-room command - One round trip to the provisioning backend.

use anyhow::Result;
use clap::Args;
use tracing::{info, warn};

use roomcall_provision::{AgentProvisioner, ProvisioningClient, ProvisioningOutcome};

use super::{CommandFailure, ConfigArgs};

#[derive(Args)]
pub struct CreateRoomArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Also start the agent in the new room and wait for the result
    #[arg(long)]
    start_bot: bool,

    /// Print the meeting token instead of redacting it
    #[arg(long)]
    show_token: bool,
}

pub async fn execute(args: CreateRoomArgs) -> Result<()> {
    let config = args.config.load()?;
    let client = ProvisioningClient::from_config(&config).ok_or_else(|| {
        CommandFailure::Config("No provisioning backend configured (set ROOMCALL_BASE_URL or --base-url)".to_string())
    })?;

    info!(base_url = %client.base_url(), "Requesting room");

    let (url, token) = match client.create_room().await {
        ProvisioningOutcome::Success { url, token } => (url, token),
        ProvisioningOutcome::CapacityExceeded => {
            return Err(CommandFailure::Provisioning("Provisioning backend is at capacity".to_string()).into());
        }
        ProvisioningOutcome::TransportFailure => {
            return Err(CommandFailure::Provisioning("Could not reach the provisioning backend".to_string()).into());
        }
    };

    println!("✅ Room created");
    println!("   URL:   {}", url);
    if args.show_token {
        println!("   Token: {}", token);
    } else {
        println!("   Token: <redacted, {} chars>", token.len());
    }

    if args.start_bot {
        match client.start_bot(&url, &token).await {
            Ok(()) => println!("🤖 Agent started"),
            Err(e) => {
                warn!(error = %e, "Agent start failed");
                println!("⚠️  Agent did not start: {}", e);
            }
        }
    }

    Ok(())
}
