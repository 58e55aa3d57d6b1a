//! Telegram Bot API delivery.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::error::AppError;

const API_BASE: &str = "https://api.telegram.org";

/// A write-only sink for the rendered report.
pub trait Notifier {
    fn send(&self, text: &str) -> Result<(), AppError>;
}

pub struct TelegramNotifier {
    client: Client,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| AppError::notify(format!("Failed to build Telegram HTTP client: {e}")))?;
        Ok(Self {
            client,
            bot_token: config.tg_bot_token.clone(),
            chat_id: config.tg_chat_id.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{API_BASE}/bot{}/sendMessage", self.bot_token)
    }
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl Notifier for TelegramNotifier {
    fn send(&self, text: &str) -> Result<(), AppError> {
        let payload = SendMessage {
            chat_id: &self.chat_id,
            text,
            parse_mode: "Markdown",
        };

        // `without_url` keeps the bot token out of error messages.
        let resp = self
            .client
            .post(self.endpoint())
            .json(&payload)
            .send()
            .map_err(|e| AppError::notify(format!("Telegram request failed: {}", e.without_url())))?;

        let status = resp.status();
        let body: Option<ApiResponse> = resp.json().ok();
        check_response(status.is_success(), status.as_u16(), body)?;

        debug!(chat_id = %self.chat_id, "telegram message delivered");
        Ok(())
    }
}

fn check_response(success: bool, status: u16, body: Option<ApiResponse>) -> Result<(), AppError> {
    let detail = body
        .as_ref()
        .and_then(|b| b.description.as_deref())
        .map(|d| format!(" {d}"))
        .unwrap_or_default();
    match body {
        Some(ApiResponse { ok: true, .. }) if success => Ok(()),
        _ if !success => Err(AppError::notify(format!(
            "Telegram request failed with status {status}.{detail}"
        ))),
        _ => Err(AppError::notify(format!("Telegram rejected the message.{detail}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EXIT_NOTIFY;

    #[test]
    fn payload_uses_markdown() {
        let payload = SendMessage {
            chat_id: "-1001",
            text: "*hi*",
            parse_mode: "Markdown",
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["chat_id"], "-1001");
        assert_eq!(json["text"], "*hi*");
        assert_eq!(json["parse_mode"], "Markdown");
    }

    #[test]
    fn ok_response_is_accepted() {
        let body: ApiResponse = serde_json::from_str(r#"{"ok":true,"result":{"message_id":1}}"#).unwrap();
        assert!(check_response(true, 200, Some(body)).is_ok());
    }

    #[test]
    fn http_error_reports_status_and_description() {
        let body: ApiResponse =
            serde_json::from_str(r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#)
                .unwrap();
        let err = check_response(false, 400, Some(body)).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_NOTIFY);
        assert!(err.message().contains("400"));
        assert!(err.message().contains("chat not found"));
    }

    #[test]
    fn unparseable_success_body_is_rejected() {
        let err = check_response(true, 200, None).unwrap_err();
        assert!(err.message().starts_with("Telegram rejected"));
    }
}
