//! Service manager integration.
//!
//! Queries systemd for the bot unit's state and pulls journal tails
//! for the status command's diagnostics.

mod systemd;

pub use systemd::{ServiceError, ServiceManager, UnitState};
