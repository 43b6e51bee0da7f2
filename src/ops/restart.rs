//! Full restart: kill sweep, webhook cleanup, relaunch, liveness check.

use anyhow::{Context, Result, bail};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::sweep::kill_matching;
use crate::config::SupervisorSettings;
use crate::process::{PidFile, spawn_detached};
use crate::telegram::BotApi;

/// Restarts the bot process.
///
/// Kills anything matching the bot's launch patterns (plus the `Python`
/// executable name), clears the webhook so the new instance polls from a
/// clean slate, relaunches detached, records the PID and verifies the
/// process survived the first few seconds.
///
/// Returns the PID of the new process.
pub async fn restart(settings: &SupervisorSettings, api: &BotApi) -> Result<u32> {
    info!("Stopping previous bot processes");
    kill_matching(
        &settings.kill_pattern_refs(),
        Some(settings.process_name.as_str()),
        settings.settle_delay(),
    )
    .await;

    clear_webhook(api).await;

    // Let the Bot API release the getUpdates lock of the old instance.
    sleep(settings.release_delay()).await;

    let pid = launch_and_verify(settings).await?;
    info!("Bot restarted, pid {}", pid);
    Ok(pid)
}

/// Deletes the webhook, dropping pending updates.
///
/// Failures are logged and swallowed: a dead token or a network blip must
/// not prevent the bot from being relaunched.
pub(crate) async fn clear_webhook(api: &BotApi) {
    match api.me().await {
        Ok(user) => debug!(
            "Token {} verified (bot id {}, @{})",
            api.token_display(),
            user.id,
            user.username.as_deref().unwrap_or("-")
        ),
        Err(e) => warn!("Token verification failed ({}), trying cleanup anyway", e),
    }

    if let Ok(info) = api.webhook_info().await
        && !info.url.is_empty()
    {
        debug!(
            "Webhook currently set to {} ({} pending updates)",
            info.url, info.pending_update_count
        );
    }

    match api.delete_webhook(true).await {
        Ok(_) => info!("Webhook deleted, pending updates dropped"),
        Err(e) => warn!("Webhook cleanup failed ({}), proceeding with launch", e),
    }
}

/// Launches the bot detached, records its PID and checks it is still
/// alive after the liveness delay.
///
/// The check goes through `try_wait` on the child handle, which reaps an
/// already-exited process instead of mistaking its zombie for a live one.
/// On failure the output log tail is dumped before the error is returned.
pub(crate) async fn launch_and_verify(settings: &SupervisorSettings) -> Result<u32> {
    let mut child = spawn_detached(settings).context("Failed to launch bot process")?;
    let pid = child.id();

    PidFile::new(&settings.pid_file)
        .write(pid)
        .context("Failed to write PID file")?;

    sleep(settings.liveness_delay()).await;

    match child.try_wait() {
        Ok(None) => Ok(pid),
        Ok(Some(status)) => {
            super::print_tail("bot output", &settings.output_log, settings.tail_lines);
            bail!("Bot process {pid} exited right after launch ({status})");
        }
        Err(e) => Err(e).context("Failed to check bot process state"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::pid_alive;
    use tempfile::TempDir;

    fn quick_settings(dir: &TempDir, launch_cmd: &str) -> SupervisorSettings {
        SupervisorSettings {
            launch_cmd: launch_cmd.to_owned(),
            working_dir: dir.path().to_path_buf(),
            pid_file: dir.path().join("bot.pid"),
            output_log: dir.path().join("bot_output.log"),
            settle_delay_secs: 0,
            release_delay_secs: 0,
            liveness_delay_secs: 0,
            ..SupervisorSettings::default()
        }
    }

    #[tokio::test]
    async fn test_launch_records_pid_of_live_process() {
        let dir = TempDir::new().unwrap();
        let settings = quick_settings(&dir, "sleep 30");

        let pid = launch_and_verify(&settings).await.unwrap();

        let recorded = PidFile::new(&settings.pid_file).read().unwrap();
        assert_eq!(recorded, Some(pid));
        assert!(pid_alive(pid));

        crate::process::force_kill(pid);
    }

    #[tokio::test]
    async fn test_launch_detects_immediate_exit() {
        let dir = TempDir::new().unwrap();
        let mut settings = quick_settings(&dir, "true");
        settings.liveness_delay_secs = 1;

        assert!(launch_and_verify(&settings).await.is_err());
    }
}
