//! Business Bot Supervisor Library
//!
//! Process-management layer for the business checklist Telegram bot.
//!
//! This crate provides the core functionality for:
//! - Starting, stopping and restarting the external bot process
//! - Clearing the bot's Telegram webhook before relaunch
//! - PID-file bookkeeping and liveness checks
//! - Service-manager status reporting with log tail diagnostics

pub mod config;
pub mod ops;
pub mod process;
pub mod service;
pub mod telegram;
