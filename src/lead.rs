use crate::errors::{AppError, MISSING_FIELDS_MESSAGE};
use crate::escape::{escape_html, escape_optional};
use crate::models::Submission;

pub const EMAIL_PLACEHOLDER: &str = "Не указан";
pub const COMPANY_PLACEHOLDER: &str = "Не указана";
pub const MESSAGE_PLACEHOLDER: &str = "Не указано";

/// A submission that passed validation.
///
/// `name` and `phone` are non-blank; optional fields are `None` when the
/// caller left them out or sent only whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lead {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub company: Option<String>,
    pub message: Option<String>,
}

impl Lead {
    /// Validates a raw submission.
    ///
    /// Fails with [`AppError::Validation`] when `name` or `phone` is absent or
    /// blank. Accepted values are trimmed.
    pub fn try_from_submission(submission: Submission) -> Result<Self, AppError> {
        let name = present(submission.name);
        let phone = present(submission.phone);

        let (Some(name), Some(phone)) = (name, phone) else {
            return Err(AppError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
        };

        Ok(Self {
            name,
            phone,
            email: present(submission.email),
            company: present(submission.company),
            message: present(submission.message),
        })
    }

    /// Renders the Telegram notification (HTML parse mode).
    ///
    /// Every user value is escaped; only the fixed labels carry markup.
    pub fn notification_text(&self) -> String {
        let name = escape_html(&self.name);
        let phone = escape_html(&self.phone);
        let email = or_placeholder(escape_optional(self.email.as_deref()), EMAIL_PLACEHOLDER);
        let company = or_placeholder(
            escape_optional(self.company.as_deref()),
            COMPANY_PLACEHOLDER,
        );
        let message = or_placeholder(
            escape_optional(self.message.as_deref()),
            MESSAGE_PLACEHOLDER,
        );

        format!(
            "🔔 <b>Новая заявка с сайта Vector AI</b>\n\
             \n\
             👤 <b>Имя:</b> {name}\n\
             📱 <b>Телефон:</b> {phone}\n\
             📧 <b>Email:</b> {email}\n\
             🏢 <b>Компания:</b> {company}\n\
             \n\
             💬 <b>Задача:</b>\n\
             {message}\n\
             \n\
             #заявка #vector_ai"
        )
    }
}

/// Trimmed value, or `None` when absent or whitespace-only.
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn or_placeholder(escaped: String, placeholder: &str) -> String {
    if escaped.is_empty() {
        placeholder.to_string()
    } else {
        escaped
    }
}
