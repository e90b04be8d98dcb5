//! Lead Relay Library
//!
//! Forwards contact-form submissions from the Vector AI site to a Telegram
//! chat and serves the static single-page site.
//!
//! # Modules
//!
//! - `api`: API definitions.
//! - `core`: Core business logic.
//! - `integrations`: External service integrations.
//! - `obs`: Observability and logging.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `escape`: HTML escaping for notification text.
//! - `handlers`: HTTP request handlers.
//! - `lead`: Submission validation and notification template.
//! - `models`: Request and response models.
//! - `routes`: Router, middleware and static site fallback.
//! - `telegram_client`: Telegram Bot API client.
//! - `telegram_models`: Telegram wire models.

pub mod api;
pub mod core;
pub mod integrations;
pub mod obs;

pub mod config;
pub mod errors;
pub mod escape;
pub mod handlers;
pub mod lead;
pub mod models;
pub mod routes;
pub mod telegram_client;
pub mod telegram_models;
