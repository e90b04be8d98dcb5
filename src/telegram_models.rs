use serde::{Deserialize, Serialize};

/// Telegram text formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseMode {
    #[serde(rename = "HTML")]
    Html,
}

/// Body of a Bot API `sendMessage` call.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest {
    pub chat_id: String,
    pub text: String,
    pub parse_mode: ParseMode,
}

impl SendMessageRequest {
    pub fn html(chat_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            text: text.into(),
            parse_mode: ParseMode::Html,
        }
    }
}

/// Envelope every Bot API method answers with.
///
/// Only the acknowledgement flag and the failure description matter here;
/// `result` and `error_code` are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub description: Option<String>,
}
