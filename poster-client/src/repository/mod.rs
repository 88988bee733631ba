//! Typed access to the backend tables
//!
//! One repository per table. Each wraps a shared [`Backend`] handle and the
//! detected [`SchemaCapabilities`], so optional columns are left out of reads
//! and writes on older deployments.
//!
//! [`Backend`]: crate::Backend
//! [`SchemaCapabilities`]: crate::SchemaCapabilities

pub mod admins;
pub mod campaigns;
pub mod orders;
pub mod settings;
pub mod status_logs;

pub use admins::AdminRepository;
pub use campaigns::CampaignRepository;
pub use orders::OrderRepository;
pub use settings::SettingsRepository;
pub use status_logs::{StatusLogPage, StatusLogRepository};

pub const TABLE_ADMINS: &str = "admins";
pub const TABLE_CAMPAIGNS: &str = "campaigns";
pub const TABLE_ORDERS: &str = "orders";
pub const TABLE_SETTINGS: &str = "app_settings";
pub const TABLE_STATUS_LOGS: &str = "order_status_logs";

/// Remote procedure behind the public status lookup
pub const RPC_SEARCH_ORDER_STATUS: &str = "search_order_status";
