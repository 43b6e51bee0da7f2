//! systemd queries via `systemctl` and `journalctl`.

use std::process::Stdio;

use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Errors from service manager queries.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Failed to run {command}: {source}")]
    Spawn {
        command: &'static str,
        source: std::io::Error,
    },
}

/// Reported state of a service unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitState {
    Active,
    Inactive,
}

impl UnitState {
    /// Parses `systemctl is-active` output.
    ///
    /// Anything other than `active` (inactive, failed, activating,
    /// unknown unit) counts as not running.
    #[must_use]
    pub fn parse(output: &str) -> Self {
        if output.trim() == "active" {
            Self::Active
        } else {
            Self::Inactive
        }
    }

    /// Whether the unit is running.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Handle for querying a single systemd unit.
#[derive(Debug, Clone)]
pub struct ServiceManager {
    unit: String,
}

impl ServiceManager {
    /// Creates a manager for the given unit name.
    #[must_use]
    pub fn new(unit: impl Into<String>) -> Self {
        Self { unit: unit.into() }
    }

    /// The unit this manager queries.
    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Queries `systemctl is-active` for the unit.
    pub async fn state(&self) -> Result<UnitState, ServiceError> {
        let output = Command::new("systemctl")
            .args(["is-active", &self.unit])
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| ServiceError::Spawn {
                command: "systemctl",
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!("systemctl is-active {}: {}", self.unit, stdout.trim());
        Ok(UnitState::parse(&stdout))
    }

    /// Returns an abbreviated `systemctl status` summary.
    pub async fn status_summary(&self, lines: usize) -> Result<String, ServiceError> {
        let output = Command::new("systemctl")
            .args(["status", &self.unit, "--no-pager", "-n", &lines.to_string()])
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| ServiceError::Spawn {
                command: "systemctl",
                source,
            })?;

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Returns the tail of the unit's journal.
    pub async fn journal_tail(&self, lines: usize) -> Result<String, ServiceError> {
        let output = Command::new("journalctl")
            .args(["-u", &self.unit, "--no-pager", "-n", &lines.to_string()])
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| ServiceError::Spawn {
                command: "journalctl",
                source,
            })?;

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
