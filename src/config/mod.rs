//! Configuration module for the bot supervisor.
//!
//! Handles loading the Telegram token and the supervisor settings
//! (paths, delays, launch command) from the environment.

mod settings;

pub use settings::{ConfigError, SupervisorSettings, TelegramConfig};

/// Default command-line patterns identifying a running bot process.
pub const KILL_PATTERNS: [&str; 2] = ["bot/main.py", "main.py"];

/// Default executable name the restart sweep terminates by exact match.
pub const PROCESS_NAME: &str = "Python";
