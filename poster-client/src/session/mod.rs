//! View-models
//!
//! Each session owns its loaded data and exposes explicit `load()` /
//! `refresh()`; nothing is cached at module level.

pub mod admin_console;
pub mod order_form;

pub use admin_console::{AdminConsole, CreatedCampaign, CsvExport, authorize, sign_in};
pub use order_form::{LookupOutcome, OrderFormSession, PublicCampaign};
