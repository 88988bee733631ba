//! Shared domain for the poster group-buy order service
//!
//! Pure, synchronous building blocks used by `poster-client` and
//! `poster-server`: row models, the field-configuration merge engine,
//! status vocabularies, input validation, CSV export and the unified
//! error codes.

pub mod error;
pub mod export;
pub mod field_config;
pub mod models;
pub mod slug;
pub mod status;
pub mod util;
pub mod validation;

// Re-exports
pub use error::{AppError, AppResult, ErrorBody, ErrorCode};
pub use validation::{FieldError, FieldResult, SubmittedValues};
