//! External service integrations.

pub mod telegram_client {
    pub use crate::telegram_client::*;
}

pub mod telegram_models {
    pub use crate::telegram_models::*;
}
