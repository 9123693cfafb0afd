//! Validate command - Check a room URL.

use anyhow::Result;
use clap::Args;
use tracing::info;

use super::{CommandFailure, ConfigArgs};

#[derive(Args)]
pub struct ValidateArgs {
    /// Room URL to check
    url: String,

    #[command(flatten)]
    config: ConfigArgs,
}

pub async fn execute(args: ValidateArgs) -> Result<()> {
    let config = args.config.load()?;
    let resolver = config.resolver()?;

    info!(domain = %resolver.domain(), "Validating room URL");

    match resolver.check(Some(&args.url)) {
        Ok(url) => {
            println!("✅ {} is a valid room URL", url);
            Ok(())
        }
        Err(e) => {
            println!("❌ {}", e);
            println!("   Expected: https://<subdomain>.{}/<room-name>", resolver.domain());
            Err(CommandFailure::Validation(e.to_string()).into())
        }
    }
}
