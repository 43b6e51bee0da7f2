//! Process supervision module.
//!
//! Everything the supervisor knows about the bot process lives here:
//! scanning the process table for matches, delivering signals, spawning
//! the detached replacement, PID-file bookkeeping and log tailing.

mod launcher;
mod logs;
mod pidfile;
mod scan;

pub use launcher::spawn_detached;
pub use logs::tail;
pub use pidfile::PidFile;
pub use scan::{ProcessMatch, find_matching, force_kill, pid_alive, terminate};

/// Errors from the process layer.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("PID file {path} is malformed: {content:?}")]
    MalformedPidFile { path: String, content: String },

    #[error("Launch command is empty")]
    EmptyLaunchCommand,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
