//! `app_settings` key/value rows

use super::TABLE_SETTINGS;
use crate::backend::{Backend, decode_rows, encode};
use crate::query::Query;
use crate::ClientResult;
use serde_json::Value;
use shared::field_config::{base_catalog, global_defaults};
use shared::models::{
    AppSetting, FieldDefaults, FieldDescriptor, SETTINGS_KEY_FIELDS, SETTINGS_KEY_STATUSES,
    StatusOptions,
};
use shared::status::{default_status_options, normalize_global, validate_global_for_save};
use std::sync::Arc;

#[derive(Clone)]
pub struct SettingsRepository {
    backend: Arc<dyn Backend>,
}

impl SettingsRepository {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    async fn value(&self, key: &str) -> ClientResult<Option<Value>> {
        let query = Query::new().select("key,value").eq("key", key).limit(1);
        let rows: Vec<AppSetting> = decode_rows(self.backend.select(TABLE_SETTINGS, &query).await?)?;
        Ok(rows.into_iter().next().map(|row| row.value))
    }

    async fn put(&self, key: &str, value: impl serde::Serialize) -> ClientResult<()> {
        let row = AppSetting::new(key, value)?;
        self.backend
            .upsert(TABLE_SETTINGS, encode(&row)?, "key")
            .await?;
        tracing::info!(key, "Setting saved");
        Ok(())
    }

    /// Global field defaults merged over the base catalog
    pub async fn global_field_config(&self) -> ClientResult<Vec<FieldDescriptor>> {
        let stored = match self.value(SETTINGS_KEY_FIELDS).await? {
            Some(value) => serde_json::from_value::<FieldDefaults>(value)
                .map(|d| d.field_config)
                .unwrap_or_default(),
            None => Vec::new(),
        };
        Ok(global_defaults(&stored))
    }

    /// [`Self::global_field_config`], falling back to the base catalog on any error
    pub async fn global_field_config_or_base(&self) -> Vec<FieldDescriptor> {
        match self.global_field_config().await {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "Global field defaults unreadable, using base catalog");
                base_catalog()
            }
        }
    }

    /// Store the global field defaults; the saved list is the merged result
    pub async fn save_global_field_config(
        &self,
        config: &[FieldDescriptor],
    ) -> ClientResult<Vec<FieldDescriptor>> {
        let merged = global_defaults(config);
        self.put(
            SETTINGS_KEY_FIELDS,
            FieldDefaults {
                field_config: merged.clone(),
            },
        )
        .await?;
        Ok(merged)
    }

    /// Global status vocabulary, defaulted when empty
    pub async fn global_status_options(&self) -> ClientResult<Vec<String>> {
        let stored = match self.value(SETTINGS_KEY_STATUSES).await? {
            Some(value) => serde_json::from_value::<StatusOptions>(value)
                .map(|s| s.options)
                .unwrap_or_default(),
            None => Vec::new(),
        };
        Ok(normalize_global(stored))
    }

    /// [`Self::global_status_options`], falling back to the default list on any error
    pub async fn global_status_options_or_default(&self) -> Vec<String> {
        match self.global_status_options().await {
            Ok(options) => options,
            Err(e) => {
                tracing::warn!(error = %e, "Global status options unreadable, using defaults");
                default_status_options()
            }
        }
    }

    /// Store the global status vocabulary; an empty list is rejected
    pub async fn save_global_status_options(&self, options: &[String]) -> ClientResult<Vec<String>> {
        let options = validate_global_for_save(options)?;
        self.put(
            SETTINGS_KEY_STATUSES,
            StatusOptions {
                options: options.clone(),
            },
        )
        .await?;
        Ok(options)
    }
}
