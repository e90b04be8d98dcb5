use crate::config::Config;
use crate::errors::{AppError, RelayError};
use crate::telegram_models::{SendMessageRequest, TelegramResponse};
use std::time::Duration;

/// Client for the Telegram Bot API `sendMessage` method.
///
/// Holds the bot credential and destination chat fixed at startup. Each call
/// makes exactly one request; there is no retry.
#[derive(Clone)]
pub struct TelegramClient {
    client: reqwest::Client,
    api_url: String,
    token: String,
    chat_id: String,
}

impl TelegramClient {
    /// Creates a new `TelegramClient`.
    ///
    /// # Arguments
    ///
    /// * `api_url` - Base URL of the Bot API, without trailing slash.
    /// * `token` - The bot token.
    /// * `chat_id` - Chat that receives every notification.
    /// * `timeout` - Request timeout; `None` keeps the transport default.
    pub fn new(
        api_url: String,
        token: String,
        chat_id: String,
        timeout: Option<Duration>,
    ) -> Result<Self, AppError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            AppError::Internal(format!("Failed to create Telegram client: {}", e))
        })?;

        Ok(Self {
            client,
            api_url,
            token,
            chat_id,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::new(
            config.telegram_api_url.clone(),
            config.telegram_bot_token.clone(),
            config.telegram_chat_id.clone(),
            config.telegram_timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_url, self.token)
    }

    /// Sends an HTML-formatted message to the configured chat.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Telegram acknowledged the message (`ok: true`).
    /// * `Err(RelayError::Rejected)` - Telegram answered with `ok: false`.
    /// * `Err(RelayError::Transport)` - No usable answer was received.
    pub async fn send_message(&self, text: &str) -> Result<(), RelayError> {
        let body = SendMessageRequest::html(self.chat_id.as_str(), text);

        tracing::debug!("Sending notification to Telegram chat {}", self.chat_id);

        let response = self
            .client
            .post(self.send_message_url())
            .json(&body)
            .send()
            .await?;

        // Failures arrive with 4xx statuses and a JSON body, so read it either way
        let status = response.status();
        let data: TelegramResponse = response.json().await.map_err(|e| {
            RelayError::Transport(format!(
                "Failed to parse Telegram response ({}): {}",
                status,
                e.without_url()
            ))
        })?;

        if data.ok {
            tracing::info!("✓ Notification delivered to chat {}", self.chat_id);
            Ok(())
        } else {
            tracing::warn!(
                "Telegram refused notification ({}): {:?}",
                status,
                data.description
            );
            Err(RelayError::Rejected {
                description: data.description,
            })
        }
    }
}
