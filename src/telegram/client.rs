//! Telegram Bot API client.
//!
//! Uses plain HTTPS calls against `https://api.telegram.org/bot<token>`.
//! Docs: <https://core.telegram.org/bots/api>

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::debug;

use crate::config::TelegramConfig;

const API_BASE: &str = "https://api.telegram.org";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors that can occur during Bot API operations.
#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Bot API error: {0}")]
    Api(String),

    #[error("Flood wait required: {0} seconds")]
    FloodWait(u32),

    #[error("Malformed Bot API response: {0}")]
    Malformed(String),
}

/// Response envelope returned by every Bot API method.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    parameters: Option<ResponseParameters>,
}

#[derive(Debug, Deserialize)]
struct ResponseParameters {
    retry_after: Option<u32>,
}

impl<T> ApiResponse<T> {
    /// Unwraps the envelope into the payload or a typed error.
    fn into_result(self) -> Result<T, TelegramError> {
        if self.ok {
            self.result
                .ok_or_else(|| TelegramError::Malformed("ok response without result".to_owned()))
        } else {
            if let Some(seconds) = self.parameters.and_then(|p| p.retry_after) {
                return Err(TelegramError::FloodWait(seconds));
            }
            Err(TelegramError::Api(
                self.description
                    .unwrap_or_else(|| "unknown error".to_owned()),
            ))
        }
    }
}

/// The authenticated bot account, as returned by `getMe`.
#[derive(Debug, Clone, Deserialize)]
pub struct BotUser {
    pub id: i64,
    pub username: Option<String>,
}

/// Current webhook state, as returned by `getWebhookInfo`.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookInfo {
    /// Registered webhook URL; empty when no webhook is set.
    pub url: String,

    /// Number of updates awaiting delivery.
    #[serde(default)]
    pub pending_update_count: u64,
}

/// Minimal Telegram Bot API client.
pub struct BotApi {
    client: reqwest::Client,
    base_url: String,
    token_display: String,
}

impl BotApi {
    /// Creates a client from the Telegram configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &TelegramConfig) -> Result<Self, TelegramError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: format!("{API_BASE}/bot{}", config.bot_token),
            token_display: redact_token(&config.bot_token),
        })
    }

    /// A display-safe form of the token for logging.
    #[must_use]
    pub fn token_display(&self) -> &str {
        &self.token_display
    }

    /// Deletes the registered webhook.
    ///
    /// With `drop_pending_updates` set, updates queued on Telegram's side
    /// are discarded as well, so the relaunched bot starts from a clean
    /// polling state.
    pub async fn delete_webhook(&self, drop_pending_updates: bool) -> Result<bool, TelegramError> {
        debug!(token = %self.token_display, "Calling deleteWebhook");

        let response: ApiResponse<bool> = self
            .client
            .post(format!("{}/deleteWebhook", self.base_url))
            .json(&json!({ "drop_pending_updates": drop_pending_updates }))
            .send()
            .await?
            .json()
            .await?;

        response.into_result()
    }

    /// Fetches the current webhook state.
    pub async fn webhook_info(&self) -> Result<WebhookInfo, TelegramError> {
        let response: ApiResponse<WebhookInfo> = self
            .client
            .get(format!("{}/getWebhookInfo", self.base_url))
            .send()
            .await?
            .json()
            .await?;

        response.into_result()
    }

    /// Verifies the token by calling `getMe`.
    pub async fn me(&self) -> Result<BotUser, TelegramError> {
        let response: ApiResponse<BotUser> = self
            .client
            .get(format!("{}/getMe", self.base_url))
            .send()
            .await?
            .json()
            .await?;

        response.into_result()
    }
}

impl std::fmt::Debug for BotApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotApi")
            .field("token", &self.token_display)
            .finish_non_exhaustive()
    }
}

/// Redacts a bot token down to its numeric bot id plus a marker.
///
/// `123456:ABC-secret` becomes `123456:***`. Tokens without the expected
/// `id:secret` shape are fully masked.
fn redact_token(token: &str) -> String {
    match token.split_once(':') {
        Some((id, _)) if id.chars().all(|c| c.is_ascii_digit()) && !id.is_empty() => {
            format!("{id}:***")
        }
        _ => "***".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse<T: serde::de::DeserializeOwned>(raw: &str) -> ApiResponse<T> {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn test_ok_envelope() {
        let response: ApiResponse<bool> = parse(r#"{"ok":true,"result":true}"#);
        assert!(response.into_result().unwrap());
    }

    #[test]
    fn test_error_envelope_carries_description() {
        let response: ApiResponse<bool> =
            parse(r#"{"ok":false,"error_code":401,"description":"Unauthorized"}"#);
        match response.into_result() {
            Err(TelegramError::Api(desc)) => assert_eq!(desc, "Unauthorized"),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_retry_after_becomes_flood_wait() {
        let response: ApiResponse<bool> = parse(
            r#"{"ok":false,"error_code":429,"description":"Too Many Requests","parameters":{"retry_after":17}}"#,
        );
        match response.into_result() {
            Err(TelegramError::FloodWait(seconds)) => assert_eq!(seconds, 17),
            other => panic!("expected FloodWait, got {other:?}"),
        }
    }

    #[test]
    fn test_ok_without_result_is_malformed() {
        let response: ApiResponse<bool> = parse(r#"{"ok":true}"#);
        assert!(matches!(
            response.into_result(),
            Err(TelegramError::Malformed(_))
        ));
    }

    #[test]
    fn test_webhook_info_parsing() {
        let response: ApiResponse<WebhookInfo> = parse(
            r#"{"ok":true,"result":{"url":"https://example.com/hook","pending_update_count":4,"has_custom_certificate":false}}"#,
        );
        let info = response.into_result().unwrap();
        assert_eq!(info.url, "https://example.com/hook");
        assert_eq!(info.pending_update_count, 4);
    }

    #[test]
    fn test_redact_token() {
        assert_eq!(redact_token("123456:ABC-DEF_secret"), "123456:***");
        assert_eq!(redact_token("not-a-token"), "***");
        assert_eq!(redact_token(":secret"), "***");
    }
}
