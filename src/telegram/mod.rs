//! Telegram Bot API client module.
//!
//! Provides the minimal HTTPS surface the supervisor needs: webhook
//! deletion (with pending-update dropping) and token verification.

mod client;

pub use client::{BotApi, BotUser, TelegramError, WebhookInfo};
