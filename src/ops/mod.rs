//! Supervisor operations.
//!
//! Each submodule is one CLI operation, a sequential recipe over the
//! process, telegram and service layers. Synchronization is fixed
//! sleeps only, matching how the bot has always been operated.

mod restart;
mod start;
mod status;
mod stop;
mod sweep;

pub use restart::restart;
pub use start::start;
pub use status::{StatusReport, status};
pub use stop::stop;

use std::path::Path;

use crate::process;

/// Prints the tail of a log file with a header, skipping missing files.
pub(crate) fn print_tail(label: &str, path: &Path, lines: usize) {
    match process::tail(path, lines) {
        Some(tail) => {
            println!("--- {} (last {} lines of {}) ---", label, lines, path.display());
            println!("{tail}");
        }
        None => println!("--- {} not found: {} ---", label, path.display()),
    }
}
