//! Campaign Model

use super::field::{CustomField, FieldDescriptor};
use crate::field_config::sanitize::{lenient_custom_fields, lenient_field_config};
use crate::status::lenient_status_options;
use crate::util::{lenient_datetime, null_as_default};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum description length accepted by the admin console
pub const MAX_DESCRIPTION_CHARS: usize = 3000;

/// Campaign row as read from the `campaigns` table.
///
/// Stored JSON columns are read leniently; columns missing on older schemas
/// deserialize as empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    pub slug: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub notice: Option<String>,
    #[serde(default = "default_active", deserialize_with = "active_flag")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "lenient_custom_fields")]
    pub custom_fields: Vec<CustomField>,
    #[serde(default, deserialize_with = "lenient_field_config")]
    pub field_config: Vec<FieldDescriptor>,
    #[serde(default, deserialize_with = "lenient_status_options")]
    pub status_options: Vec<String>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

fn active_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// Insert payload for `campaigns`.
///
/// `field_config` and `status_options` are `None` when the remote schema
/// lacks those columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignCreate {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub custom_fields: Vec<CustomField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_config: Option<Vec<FieldDescriptor>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_options: Option<Vec<String>>,
    pub is_active: bool,
}

/// Update payload for `campaigns`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignUpdate {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub is_active: bool,
    pub custom_fields: Vec<CustomField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_config: Option<Vec<FieldDescriptor>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_options: Option<Vec<String>>,
}

/// Admin input for creating a campaign
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCampaign {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Free-form JSON array of custom field definitions
    #[serde(default)]
    pub custom_fields_json: String,
}

/// Admin input for the campaign settings form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CampaignSettings {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub notice: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub custom_fields_json: String,
    /// Edited field configuration; re-merged before saving
    #[serde(default)]
    pub field_config: Vec<FieldDescriptor>,
    #[serde(default = "default_active")]
    pub use_global_status: bool,
    #[serde(default)]
    pub status_options: Vec<String>,
}
