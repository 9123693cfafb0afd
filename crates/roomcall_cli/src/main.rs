//! roomcall CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments or configuration
//! - 3: Validation failure
//! - 4: Provisioning failure
//! - 5: Join failure

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

use commands::{Cli, Commands, CommandFailure};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const VALIDATION_FAILURE: u8 = 3;
    pub const PROVISIONING_FAILURE: u8 = 4;
    pub const JOIN_FAILURE: u8 = 5;
}

const LOG_TARGETS: [&str; 4] = ["roomcall", "roomcall_core", "roomcall_provision", "roomcall_session"];

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    let default_filter = LOG_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .chain(std::iter::once("warn".to_string()))
        .collect::<Vec<_>>()
        .join(",");

    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }

    let result = match cli.command {
        Commands::Validate(args) => commands::validate::execute(args).await,
        Commands::CreateRoom(args) => commands::create_room::execute(args).await,
        Commands::Session(args) => commands::session::execute(args).await,
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Map an error to its exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    match e.downcast_ref::<CommandFailure>() {
        Some(CommandFailure::Config(_)) => ExitCodes::INVALID_ARGS,
        Some(CommandFailure::Validation(_)) => ExitCodes::VALIDATION_FAILURE,
        Some(CommandFailure::Provisioning(_)) => ExitCodes::PROVISIONING_FAILURE,
        Some(CommandFailure::Join(_)) => ExitCodes::JOIN_FAILURE,
        None if e.downcast_ref::<roomcall_core::CoreError>().is_some() => ExitCodes::INVALID_ARGS,
        None => ExitCodes::GENERAL_ERROR,
    }
}
