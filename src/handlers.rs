use crate::config::Config;
use crate::errors::{AppError, MALFORMED_BODY_MESSAGE};
use crate::lead::Lead;
use crate::models::{HealthResponse, LeadResponse, Submission};
use crate::telegram_client::TelegramClient;
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use std::sync::Arc;

pub const LEAD_SENT_MESSAGE: &str = "Заявка отправлена";

/// Shared application state injected into handlers.
///
/// Read-only after startup; requests never mutate it.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Client for the Telegram Bot API.
    pub telegram: TelegramClient,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, AppError> {
        let telegram = TelegramClient::from_config(&config)?;
        Ok(Self { config, telegram })
    }
}

/// Health check endpoint.
///
/// Never contacts Telegram, so it reports the process only.
pub async fn health() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            message: "Server is running".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }),
    )
}

/// POST /api/send-lead
///
/// Validates the contact-form submission, renders the notification and
/// relays it to the configured Telegram chat with a single request.
///
/// # Returns
///
/// * `200` with `{success: true, message}` once Telegram acknowledges.
/// * `400` when the body is malformed or `name`/`phone` is missing.
/// * `413` when the body exceeds the lead size limit.
/// * `500` when Telegram refuses the message or cannot be reached.
pub async fn send_lead(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Submission>, JsonRejection>,
) -> Result<Json<LeadResponse>, AppError> {
    let Json(submission) = payload.map_err(|rejection| {
        tracing::debug!("Unreadable lead body: {}", rejection.body_text());
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::Validation(MALFORMED_BODY_MESSAGE.to_string())
        }
    })?;

    let lead = Lead::try_from_submission(submission)?;
    tracing::info!(
        "📨 Received lead (email: {}, company: {}, message: {})",
        lead.email.is_some(),
        lead.company.is_some(),
        lead.message.is_some()
    );

    state
        .telegram
        .send_message(&lead.notification_text())
        .await?;

    Ok(Json(LeadResponse {
        success: true,
        message: LEAD_SENT_MESSAGE.to_string(),
    }))
}
