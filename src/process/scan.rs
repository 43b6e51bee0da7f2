//! Process table scanning and signal delivery.
//!
//! Matching reads `/proc/<pid>/cmdline` (argv joined with spaces, matched
//! by substring) and `/proc/<pid>/comm` (matched exactly). The scanning
//! process itself is always excluded so a sweep never kills the supervisor.

use std::fs;
use std::path::Path;

use tracing::{debug, trace};

/// A process found by [`find_matching`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessMatch {
    /// Process identifier.
    pub pid: u32,

    /// Full command line with argv separators replaced by spaces.
    pub cmdline: String,
}

/// Finds live processes whose command line contains one of `patterns`
/// or whose executable name equals `name` (when given).
#[must_use]
pub fn find_matching(patterns: &[&str], name: Option<&str>) -> Vec<ProcessMatch> {
    let own_pid = std::process::id();
    let mut matches = Vec::new();

    let Ok(entries) = fs::read_dir("/proc") else {
        return matches;
    };

    for entry in entries.flatten() {
        let Some(pid) = entry
            .file_name()
            .to_str()
            .and_then(|n| n.parse::<u32>().ok())
        else {
            continue;
        };

        if pid == own_pid {
            continue;
        }

        let Some(cmdline) = read_cmdline(&entry.path()) else {
            continue;
        };

        let comm = read_comm(&entry.path());
        if matches_any(&cmdline, comm.as_deref(), patterns, name) {
            trace!("Matched pid {}: {}", pid, cmdline);
            matches.push(ProcessMatch { pid, cmdline });
        }
    }

    matches
}

/// Checks whether a process matches the sweep criteria.
///
/// Empty patterns are skipped: `contains("")` holds for every command
/// line, which would turn the sweep into a kill-everything pass.
fn matches_any(
    cmdline: &str,
    comm: Option<&str>,
    patterns: &[&str],
    name: Option<&str>,
) -> bool {
    if patterns
        .iter()
        .any(|p| !p.is_empty() && cmdline.contains(p))
    {
        return true;
    }
    match (comm, name) {
        (Some(comm), Some(name)) => comm == name,
        _ => false,
    }
}

/// Reads and joins `/proc/<pid>/cmdline`. Kernel threads (empty cmdline)
/// yield `None`.
fn read_cmdline(proc_dir: &Path) -> Option<String> {
    let raw = fs::read(proc_dir.join("cmdline")).ok()?;
    if raw.is_empty() {
        return None;
    }

    let joined = raw
        .split(|&b| b == 0)
        .filter(|part| !part.is_empty())
        .map(|part| String::from_utf8_lossy(part).into_owned())
        .collect::<Vec<_>>()
        .join(" ");

    if joined.is_empty() { None } else { Some(joined) }
}

/// Reads `/proc/<pid>/comm` without its trailing newline.
fn read_comm(proc_dir: &Path) -> Option<String> {
    fs::read_to_string(proc_dir.join("comm"))
        .ok()
        .map(|s| s.trim_end().to_owned())
}

/// Checks whether a process with the given PID is alive.
///
/// Uses signal 0: delivery is not attempted, only the existence and
/// permission checks run. EPERM still means the process exists.
#[must_use]
pub fn pid_alive(pid: u32) -> bool {
    match send_signal(pid, 0) {
        Ok(()) => true,
        Err(errno) => errno == libc::EPERM,
    }
}

/// Sends SIGTERM to `pid`. Already-dead processes are not an error.
pub fn terminate(pid: u32) {
    if let Err(errno) = send_signal(pid, libc::SIGTERM) {
        debug!("SIGTERM to pid {} failed (errno {})", pid, errno);
    }
}

/// Sends SIGKILL to `pid`. Already-dead processes are not an error.
pub fn force_kill(pid: u32) {
    if let Err(errno) = send_signal(pid, libc::SIGKILL) {
        debug!("SIGKILL to pid {} failed (errno {})", pid, errno);
    }
}

/// Raw signal delivery, returning errno on failure.
#[allow(unsafe_code)]
fn send_signal(pid: u32, signal: libc::c_int) -> Result<(), libc::c_int> {
    // SAFETY: kill(2) has no memory-safety preconditions.
    let rc = unsafe { libc::kill(pid as libc::pid_t, signal) };
    if rc == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error().raw_os_error().unwrap_or(0))
    }
}
