//! Status: service-manager state plus log diagnostics.

use anyhow::{Context, Result};
use chrono::Local;
use tracing::debug;

use crate::config::SupervisorSettings;
use crate::process::{PidFile, pid_alive};
use crate::service::{ServiceManager, UnitState};

/// Outcome of the status command, for the caller's exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusReport {
    /// The service unit is active.
    Running,
    /// The service unit is inactive, failed or unknown.
    NotRunning,
}

impl StatusReport {
    /// Maps the service manager's reported state to the command outcome.
    #[must_use]
    pub const fn from_state(state: UnitState) -> Self {
        if state.is_active() {
            Self::Running
        } else {
            Self::NotRunning
        }
    }
}

/// Queries the bot's service unit and prints a status report.
///
/// An active unit gets an abbreviated `systemctl status` summary. An
/// inactive one gets the journal tail plus the service log tails (each
/// guarded by an existence check). The bot VERSION and the PID-file
/// liveness are reported in both cases.
pub async fn status(settings: &SupervisorSettings) -> Result<StatusReport> {
    let manager = ServiceManager::new(&settings.service_unit);

    println!(
        "Bot status at {} (unit: {})",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        manager.unit()
    );
    print_version_line(settings);
    print_pid_line(settings);

    let state = manager
        .state()
        .await
        .context("Failed to query service manager")?;
    let report = StatusReport::from_state(state);

    if report == StatusReport::Running {
        println!("Service is active");
        let summary = manager
            .status_summary(settings.tail_lines)
            .await
            .context("Failed to read service status")?;
        println!("{summary}");
        return Ok(report);
    }

    println!("Service is NOT active");

    match manager.journal_tail(settings.tail_lines).await {
        Ok(journal) => {
            println!("--- journal (last {} lines) ---", settings.tail_lines);
            println!("{journal}");
        }
        Err(e) => debug!("Journal unavailable: {}", e),
    }

    if settings.service_log.exists() {
        super::print_tail("service log", &settings.service_log, settings.tail_lines);
    }
    if settings.service_err_log.exists() {
        super::print_tail(
            "service error log",
            &settings.service_err_log,
            settings.tail_lines,
        );
    }

    Ok(report)
}

/// Prints the bot's VERSION file content when present.
fn print_version_line(settings: &SupervisorSettings) {
    if let Ok(version) = std::fs::read_to_string(&settings.version_file) {
        println!("Bot version: {}", version.trim());
    }
}

/// Prints the recorded PID and whether that process is alive.
fn print_pid_line(settings: &SupervisorSettings) {
    match PidFile::new(&settings.pid_file).read() {
        Ok(Some(pid)) if pid_alive(pid) => println!("Recorded pid {pid} (alive)"),
        Ok(Some(pid)) => println!("Recorded pid {pid} (not running)"),
        Ok(None) => {}
        Err(e) => println!("PID file unreadable: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_follows_unit_state() {
        assert_eq!(
            StatusReport::from_state(UnitState::Active),
            StatusReport::Running
        );
        assert_eq!(
            StatusReport::from_state(UnitState::Inactive),
            StatusReport::NotRunning
        );
    }

    #[test]
    fn test_report_from_raw_systemctl_output() {
        // End to end over the parse step: raw is-active output decides
        // the command outcome.
        for (raw, expected) in [
            ("active\n", StatusReport::Running),
            ("inactive\n", StatusReport::NotRunning),
            ("failed\n", StatusReport::NotRunning),
        ] {
            assert_eq!(StatusReport::from_state(UnitState::parse(raw)), expected);
        }
    }
}
