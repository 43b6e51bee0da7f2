//! Kill pass shared by the restart, start and stop operations.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

use crate::process::{find_matching, force_kill, terminate};

/// Terminates every process matching `patterns`/`name`, waits out the
/// settle delay, then force-kills survivors by PID.
///
/// Returns the number of processes that received SIGTERM.
pub(crate) async fn kill_matching(
    patterns: &[&str],
    name: Option<&str>,
    settle_delay: Duration,
) -> usize {
    let matches = find_matching(patterns, name);
    if matches.is_empty() {
        info!("No running bot processes found");
        return 0;
    }

    for m in &matches {
        info!("Terminating pid {} ({})", m.pid, m.cmdline);
        terminate(m.pid);
    }

    sleep(settle_delay).await;

    let survivors = find_matching(patterns, name);
    for m in &survivors {
        warn!("Pid {} survived SIGTERM, force-killing", m.pid);
        force_kill(m.pid);
    }

    matches.len()
}
