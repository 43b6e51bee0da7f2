//! Supervisor settings and Telegram configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Telegram Bot API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot token (obtain from `@BotFather`).
    pub bot_token: String,
}

impl TelegramConfig {
    /// Creates a new Telegram configuration.
    #[must_use]
    pub fn new(bot_token: String) -> Self {
        Self { bot_token }
    }

    /// Creates configuration from environment variables.
    ///
    /// Expects `BOT_TOKEN` to be set (usually via a `.env` file).
    ///
    /// # Errors
    ///
    /// Returns an error if `BOT_TOKEN` is missing or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bot_token =
            std::env::var("BOT_TOKEN").map_err(|_| ConfigError::MissingEnvVar("BOT_TOKEN"))?;

        if bot_token.trim().is_empty() {
            return Err(ConfigError::EmptyToken);
        }

        Ok(Self { bot_token })
    }
}

/// Supervisor-specific settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisorSettings {
    /// Command line used to launch the bot process.
    #[serde(default = "default_launch_cmd")]
    pub launch_cmd: String,

    /// Working directory for the launched process.
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,

    /// Path to the PID file written after a restart.
    #[serde(default = "default_pid_file")]
    pub pid_file: PathBuf,

    /// Log file the launched process's stdout/stderr is appended to.
    #[serde(default = "default_output_log")]
    pub output_log: PathBuf,

    /// Service manager unit queried by the status command.
    #[serde(default = "default_service_unit")]
    pub service_unit: String,

    /// Service log file tailed when the unit is inactive.
    #[serde(default = "default_service_log")]
    pub service_log: PathBuf,

    /// Service error log file tailed when the unit is inactive.
    #[serde(default = "default_service_err_log")]
    pub service_err_log: PathBuf,

    /// Path to the bot's VERSION file, reported by the status command.
    #[serde(default = "default_version_file")]
    pub version_file: PathBuf,

    /// Command-line patterns the restart/stop sweep terminates by
    /// substring match.
    #[serde(default = "default_kill_patterns")]
    pub kill_patterns: Vec<String>,

    /// Executable name the sweep also terminates by exact match.
    #[serde(default = "default_process_name")]
    pub process_name: String,

    /// Delay between SIGTERM and the SIGKILL sweep, in seconds.
    #[serde(default = "default_settle_delay")]
    pub settle_delay_secs: u64,

    /// Delay after webhook deletion before relaunching, in seconds.
    ///
    /// Gives the Bot API time to release the `getUpdates` lock held
    /// by the previous instance.
    #[serde(default = "default_release_delay")]
    pub release_delay_secs: u64,

    /// Delay before the post-launch liveness check, in seconds.
    #[serde(default = "default_liveness_delay")]
    pub liveness_delay_secs: u64,

    /// Number of log lines dumped on failure.
    #[serde(default = "default_tail_lines")]
    pub tail_lines: usize,
}

fn default_launch_cmd() -> String {
    "python3 bot/main.py".to_owned()
}

fn default_working_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_pid_file() -> PathBuf {
    PathBuf::from("bot.pid")
}

fn default_output_log() -> PathBuf {
    PathBuf::from("bot_output.log")
}

fn default_service_unit() -> String {
    "bot.service".to_owned()
}

fn default_service_log() -> PathBuf {
    PathBuf::from("/var/log/bot/bot.log")
}

fn default_service_err_log() -> PathBuf {
    PathBuf::from("/var/log/bot/bot.err.log")
}

fn default_version_file() -> PathBuf {
    PathBuf::from("VERSION")
}

fn default_kill_patterns() -> Vec<String> {
    crate::config::KILL_PATTERNS
        .iter()
        .map(|&p| p.to_owned())
        .collect()
}

fn default_process_name() -> String {
    crate::config::PROCESS_NAME.to_owned()
}

fn default_settle_delay() -> u64 {
    2
}

fn default_release_delay() -> u64 {
    3
}

fn default_liveness_delay() -> u64 {
    3
}

fn default_tail_lines() -> usize {
    20
}

impl Default for SupervisorSettings {
    fn default() -> Self {
        Self {
            launch_cmd: default_launch_cmd(),
            working_dir: default_working_dir(),
            pid_file: default_pid_file(),
            output_log: default_output_log(),
            service_unit: default_service_unit(),
            service_log: default_service_log(),
            service_err_log: default_service_err_log(),
            version_file: default_version_file(),
            kill_patterns: default_kill_patterns(),
            process_name: default_process_name(),
            settle_delay_secs: default_settle_delay(),
            release_delay_secs: default_release_delay(),
            liveness_delay_secs: default_liveness_delay(),
            tail_lines: default_tail_lines(),
        }
    }
}

impl SupervisorSettings {
    /// Creates supervisor settings from environment variables with defaults.
    #[must_use]
    pub fn from_env_with_defaults() -> Self {
        Self {
            launch_cmd: std::env::var("BOT_LAUNCH_CMD").unwrap_or_else(|_| default_launch_cmd()),
            working_dir: std::env::var("BOT_WORKING_DIR")
                .map_or_else(|_| default_working_dir(), PathBuf::from),
            pid_file: std::env::var("BOT_PID_FILE")
                .map_or_else(|_| default_pid_file(), PathBuf::from),
            output_log: std::env::var("BOT_OUTPUT_LOG")
                .map_or_else(|_| default_output_log(), PathBuf::from),
            service_unit: std::env::var("BOT_SERVICE_UNIT")
                .unwrap_or_else(|_| default_service_unit()),
            service_log: std::env::var("BOT_SERVICE_LOG")
                .map_or_else(|_| default_service_log(), PathBuf::from),
            service_err_log: std::env::var("BOT_SERVICE_ERR_LOG")
                .map_or_else(|_| default_service_err_log(), PathBuf::from),
            version_file: std::env::var("BOT_VERSION_FILE")
                .map_or_else(|_| default_version_file(), PathBuf::from),
            kill_patterns: std::env::var("BOT_KILL_PATTERNS")
                .map_or_else(|_| default_kill_patterns(), |raw| parse_kill_patterns(&raw)),
            process_name: std::env::var("BOT_PROCESS_NAME")
                .unwrap_or_else(|_| default_process_name()),
            settle_delay_secs: env_u64("BOT_SETTLE_DELAY", default_settle_delay()),
            release_delay_secs: env_u64("BOT_RELEASE_DELAY", default_release_delay()),
            liveness_delay_secs: env_u64("BOT_LIVENESS_DELAY", default_liveness_delay()),
            tail_lines: std::env::var("BOT_TAIL_LINES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_tail_lines),
        }
    }

    /// Delay between SIGTERM and the SIGKILL sweep.
    #[must_use]
    pub const fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_delay_secs)
    }

    /// Delay after webhook deletion before relaunching.
    #[must_use]
    pub const fn release_delay(&self) -> Duration {
        Duration::from_secs(self.release_delay_secs)
    }

    /// Delay before the post-launch liveness check.
    #[must_use]
    pub const fn liveness_delay(&self) -> Duration {
        Duration::from_secs(self.liveness_delay_secs)
    }

    /// The kill patterns as borrowed strings, for the process scanner.
    #[must_use]
    pub fn kill_pattern_refs(&self) -> Vec<&str> {
        self.kill_patterns.iter().map(String::as_str).collect()
    }

    /// The primary pattern identifying the bot in a process listing.
    ///
    /// This is the script argument of the launch command when present,
    /// falling back to the whole command line.
    #[must_use]
    pub fn primary_pattern(&self) -> &str {
        self.launch_cmd
            .split_whitespace()
            .nth(1)
            .unwrap_or(&self.launch_cmd)
    }
}

/// Parses a comma-separated pattern list, dropping empty entries.
///
/// An empty pattern would substring-match every command line, so a bare
/// `BOT_KILL_PATTERNS=` or a trailing comma must not produce one.
fn parse_kill_patterns(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_owned)
        .collect()
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "Missing required environment variable: {0}. \
         Make sure a .env file exists and contains {0}=your_token_here"
    )]
    MissingEnvVar(&'static str),

    #[error("BOT_TOKEN is set but empty")]
    EmptyToken,
}
