//! Bot Supervisor - Main Entry Point
//!
//! CLI for starting, stopping, restarting and checking the business
//! checklist Telegram bot process.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use botctl::config::{SupervisorSettings, TelegramConfig};
use botctl::ops::{self, StatusReport};
use botctl::telegram::BotApi;

/// Process supervisor for the business checklist Telegram bot.
#[derive(Parser, Debug)]
#[command(name = "botctl")]
#[command(about = "Start, stop, restart and check the business bot process")]
#[command(version)]
struct Args {
    /// Path to the .env file for environment variables.
    #[arg(long, default_value = ".env")]
    env_file: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Launch the bot after a light kill pass and webhook cleanup.
    Start,

    /// Stop the bot by recorded PID, then sweep for strays.
    Stop,

    /// Full restart: kill sweep, webhook cleanup, relaunch, PID check.
    Restart,

    /// Report the service unit state, with log tails when inactive.
    Status,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    init_logging(&args.log_level);

    // Load environment variables
    if let Err(e) = dotenvy::from_filename(&args.env_file) {
        debug!("Could not load .env file ({}): {}", args.env_file, e);
    }

    let settings = SupervisorSettings::from_env_with_defaults();

    match args.command {
        Command::Start => {
            let api = bot_api()?;
            ops::start(&settings, &api).await?;
        }
        Command::Stop => {
            ops::stop(&settings).await?;
        }
        Command::Restart => {
            let api = bot_api()?;
            let pid = ops::restart(&settings, &api).await?;
            println!("Bot restarted, pid {pid}");
        }
        Command::Status => {
            if ops::status(&settings).await? == StatusReport::NotRunning {
                return Ok(ExitCode::from(1));
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Builds the Bot API client from the environment-provided token.
fn bot_api() -> Result<BotApi> {
    let config = TelegramConfig::from_env()
        .context("Failed to load Telegram configuration from environment")?;
    BotApi::new(&config).context("Failed to build Bot API client")
}

/// Initializes the logging subsystem.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
