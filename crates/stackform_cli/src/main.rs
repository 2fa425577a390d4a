//! Stackform CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments or unreadable input
//! - 3: Template has blocking errors

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod output;

use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const TEMPLATE_ERRORS: u8 = 3;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        "stackform=debug"
    } else if cli.quiet {
        "stackform=error"
    } else {
        "stackform=info"
    };
    let mut filter = EnvFilter::from_default_env();
    for directive in [default_level, "warn"] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }
    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }

    let result = match cli.command {
        Commands::ParseVars(args) => commands::parse_vars::execute(args, &cli.global).await,
        Commands::ParseDotenv(args) => commands::parse_dotenv::execute(args, &cli.global).await,
        Commands::TemplateVars(args) => commands::template_vars::execute(args, &cli.global).await,
        Commands::RenderDotenv(args) => commands::render_dotenv::execute(args, &cli.global).await,
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    if e.downcast_ref::<commands::BlockingErrors>().is_some() {
        return ExitCodes::TEMPLATE_ERRORS;
    }

    let msg = format!("{:#}", e).to_lowercase();
    if msg.contains("failed to read") || msg.contains("invalid options") || msg.contains("stored schema") {
        ExitCodes::INVALID_ARGS
    } else {
        ExitCodes::GENERAL_ERROR
    }
}
