use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Message returned when a required form field is missing.
pub const MISSING_FIELDS_MESSAGE: &str = "Имя и телефон обязательны";
/// Message returned when the request body cannot be read as a submission.
pub const MALFORMED_BODY_MESSAGE: &str = "Некорректный формат заявки";
/// Message returned when Telegram rejects a message without a description.
pub const RELAY_FAILED_MESSAGE: &str = "Ошибка отправки в Telegram";
/// Message returned when the lead body exceeds the size limit.
pub const PAYLOAD_TOO_LARGE_MESSAGE: &str = "Слишком большая заявка";
/// Message returned when a client exceeds the lead rate limit.
pub const TOO_MANY_REQUESTS_MESSAGE: &str = "Слишком много заявок, попробуйте позже";
/// Message returned for every failure whose cause stays server-side.
pub const INTERNAL_ERROR_MESSAGE: &str = "Внутренняя ошибка сервера";

/// Application-specific error types.
#[derive(Debug, Clone)]
pub enum AppError {
    /// The submission is missing a required field or is malformed.
    Validation(String),
    /// The request body is larger than the lead endpoint accepts.
    PayloadTooLarge,
    /// The client exceeded its lead rate limit.
    TooManyRequests,
    /// Telegram answered but refused the message.
    Relay(Option<String>),
    /// Telegram could not be reached or answered with garbage.
    Transport(String),
    /// Internal server error.
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::PayloadTooLarge => write!(f, "Payload too large"),
            AppError::TooManyRequests => write!(f, "Too many requests"),
            AppError::Relay(Some(description)) => write!(f, "Relay rejected: {}", description),
            AppError::Relay(None) => write!(f, "Relay rejected without description"),
            AppError::Transport(msg) => write!(f, "Transport error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Status code and caller-facing message for this error.
    ///
    /// Transport and internal causes are never exposed to the caller.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                PAYLOAD_TOO_LARGE_MESSAGE.to_string(),
            ),
            AppError::TooManyRequests => (
                StatusCode::TOO_MANY_REQUESTS,
                TOO_MANY_REQUESTS_MESSAGE.to_string(),
            ),
            AppError::Relay(description) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                description
                    .clone()
                    .filter(|d| !d.trim().is_empty())
                    .unwrap_or_else(|| RELAY_FAILED_MESSAGE.to_string()),
            ),
            AppError::Transport(_) | AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR_MESSAGE.to_string(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    /// Converts the error into the `{success: false, error}` envelope.
    ///
    /// Logs errors according to their severity.
    fn into_response(self) -> Response {
        match &self {
            AppError::Validation(msg) => tracing::warn!("Rejected submission: {}", msg),
            AppError::PayloadTooLarge => tracing::warn!("Rejected oversized lead body"),
            AppError::TooManyRequests => tracing::warn!("Lead rate limit exceeded"),
            AppError::Relay(description) => {
                tracing::error!("Telegram error: {:?}", description)
            }
            AppError::Transport(msg) => tracing::error!("Telegram transport error: {}", msg),
            AppError::Internal(msg) => tracing::error!("Server error: {}", msg),
        }

        let (status, error_message) = self.status_and_message();
        let body = Json(json!({
            "success": false,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Failure of the single outbound `sendMessage` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// Telegram answered with a falsy `ok` flag.
    Rejected { description: Option<String> },
    /// Network failure, timeout, or a body that is not a Telegram response.
    Transport(String),
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayError::Rejected {
                description: Some(d),
            } => write!(f, "Telegram rejected the message: {}", d),
            RelayError::Rejected { description: None } => {
                write!(f, "Telegram rejected the message")
            }
            RelayError::Transport(msg) => write!(f, "Telegram request failed: {}", msg),
        }
    }
}

impl std::error::Error for RelayError {}

impl From<RelayError> for AppError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::Rejected { description } => AppError::Relay(description),
            RelayError::Transport(msg) => AppError::Transport(msg),
        }
    }
}

impl From<reqwest::Error> for RelayError {
    /// Strips the request URL first: it embeds the bot token.
    fn from(err: reqwest::Error) -> Self {
        RelayError::Transport(err.without_url().to_string())
    }
}
