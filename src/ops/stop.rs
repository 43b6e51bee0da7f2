//! Stop: terminate the recorded PID, then sweep for strays.

use anyhow::{Context, Result};
use tokio::time::sleep;
use tracing::{info, warn};

use super::sweep::kill_matching;
use crate::config::SupervisorSettings;
use crate::process::{PidFile, force_kill, pid_alive, terminate};

/// Stops the bot process.
///
/// The PID file is consulted first; whatever it names gets SIGTERM, the
/// settle delay, then SIGKILL if still alive. A pattern sweep afterwards
/// catches instances launched outside the supervisor. The PID file is
/// removed on the way out.
pub async fn stop(settings: &SupervisorSettings) -> Result<()> {
    let pidfile = PidFile::new(&settings.pid_file);

    match pidfile.read() {
        Ok(Some(pid)) if pid_alive(pid) => {
            info!("Terminating recorded pid {}", pid);
            terminate(pid);
            sleep(settings.settle_delay()).await;
            if pid_alive(pid) {
                warn!("Pid {} survived SIGTERM, force-killing", pid);
                force_kill(pid);
            }
        }
        Ok(Some(pid)) => info!("Recorded pid {} is not running", pid),
        Ok(None) => info!("No PID file at {}", settings.pid_file.display()),
        Err(e) => warn!("Ignoring unreadable PID file: {}", e),
    }

    kill_matching(
        &settings.kill_pattern_refs(),
        Some(settings.process_name.as_str()),
        settings.settle_delay(),
    )
    .await;

    pidfile.remove().context("Failed to remove PID file")?;
    info!("Bot stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn quick_settings(dir: &TempDir) -> SupervisorSettings {
        SupervisorSettings {
            pid_file: dir.path().join("bot.pid"),
            settle_delay_secs: 0,
            // Patterns that match nothing, so the sweep is a no-op here.
            kill_patterns: vec!["no-such-pattern-zzqy".to_owned()],
            process_name: "no-such-comm-zzqy".to_owned(),
            ..SupervisorSettings::default()
        }
    }

    #[tokio::test]
    async fn test_stop_without_pid_file() {
        let dir = TempDir::new().unwrap();
        let settings = quick_settings(&dir);

        stop(&settings).await.unwrap();
        assert!(!settings.pid_file.exists());
    }

    #[tokio::test]
    async fn test_stop_removes_stale_pid_file() {
        let dir = TempDir::new().unwrap();
        let settings = quick_settings(&dir);

        // A pid that cannot exist, i.e. a leftover from a dead instance.
        PidFile::new(&settings.pid_file).write(999_999_999).unwrap();

        stop(&settings).await.unwrap();
        assert!(!settings.pid_file.exists());
    }

    #[tokio::test]
    async fn test_stop_tolerates_junk_pid_file() {
        let dir = TempDir::new().unwrap();
        let settings = quick_settings(&dir);
        std::fs::write(&settings.pid_file, "garbage").unwrap();

        stop(&settings).await.unwrap();
        assert!(!settings.pid_file.exists());
    }
}
