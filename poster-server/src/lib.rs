//! poster-server - HTTP service for the poster group-buy order form
//!
//! - Public API: active campaigns, order submission, status lookup
//! - Admin API: sign-in, campaigns, global defaults, orders, CSV export
//!
//! The backend schema is checked once at startup; every request builds its
//! view-model from the shared backend handle.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod state;

pub use config::Config;
pub use error::{ServiceError, ServiceResult};
pub use state::AppState;
