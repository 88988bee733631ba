//! Data models
//!
//! Row types mirror the BaaS tables (`campaigns`, `orders`, `admins`,
//! `app_settings`, `order_status_logs`). IDs are the backend's UUID strings.

pub mod admin;
pub mod campaign;
pub mod field;
pub mod order;
pub mod settings;

// Re-exports
pub use admin::*;
pub use campaign::*;
pub use field::*;
pub use order::*;
pub use settings::*;
