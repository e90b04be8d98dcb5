// Domain-layer modules and shared errors/models
pub mod lead {
    pub use crate::lead::*;
}

pub mod escape {
    pub use crate::escape::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
