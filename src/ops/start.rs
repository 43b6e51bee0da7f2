//! Plain start: single-pattern kill, webhook cleanup, relaunch.

use anyhow::{Result, bail};
use tokio::time::sleep;
use tracing::info;

use super::restart::clear_webhook;
use super::sweep::kill_matching;
use crate::config::SupervisorSettings;
use crate::process::{find_matching, spawn_detached};
use crate::telegram::BotApi;

/// Starts the bot process.
///
/// A lighter variant of restart: only processes matching the primary
/// launch pattern are terminated, no PID file is written, and liveness
/// is verified by a process-list pattern match instead of a PID probe.
pub async fn start(settings: &SupervisorSettings, api: &BotApi) -> Result<()> {
    let pattern = settings.primary_pattern().to_owned();

    info!("Stopping bot processes matching '{}'", pattern);
    kill_matching(&[pattern.as_str()], None, settings.settle_delay()).await;

    clear_webhook(api).await;
    sleep(settings.release_delay()).await;

    let mut child = spawn_detached(settings)?;
    sleep(settings.liveness_delay()).await;

    // Reap the child if it already exited; liveness is decided by the
    // pattern scan below, not by this handle.
    let _ = child.try_wait();

    let running = find_matching(&[pattern.as_str()], None);
    if running.is_empty() {
        super::print_tail("bot output", &settings.output_log, settings.tail_lines);
        bail!("No process matching '{pattern}' is running after launch");
    }

    info!("Bot started ({} matching process(es))", running.len());
    Ok(())
}
