//! Remote schema capability detection
//!
//! Older deployments lack some optional columns and the status log table.
//! Detection runs once at startup (`select=<col>&limit=0` per optional
//! column) and the repositories shape their payloads from the result instead
//! of retrying on error text.

use crate::backend::Backend;
use crate::query::Query;
use crate::{ClientError, ClientResult};
use serde::{Deserialize, Serialize};

/// Optional parts of the remote schema that are present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaCapabilities {
    /// `campaigns.field_config`
    pub campaign_field_config: bool,
    /// `campaigns.status_options`
    pub campaign_status_options: bool,
    /// `campaigns.notice`
    pub campaign_notice: bool,
    /// `orders.field_snapshot`
    pub order_field_snapshot: bool,
    /// `order_status_logs` table
    pub status_logs: bool,
}

impl Default for SchemaCapabilities {
    fn default() -> Self {
        Self::full()
    }
}

impl SchemaCapabilities {
    /// Every optional column and table present
    pub fn full() -> Self {
        Self {
            campaign_field_config: true,
            campaign_status_options: true,
            campaign_notice: true,
            order_field_snapshot: true,
            status_logs: true,
        }
    }

    /// Only the columns every deployment has
    pub fn minimal() -> Self {
        Self {
            campaign_field_config: false,
            campaign_status_options: false,
            campaign_notice: false,
            order_field_snapshot: false,
            status_logs: false,
        }
    }

    /// Check which optional columns the backend has
    pub async fn detect(backend: &dyn Backend) -> ClientResult<Self> {
        let caps = Self {
            campaign_field_config: has_column(backend, "campaigns", "field_config").await?,
            campaign_status_options: has_column(backend, "campaigns", "status_options").await?,
            campaign_notice: has_column(backend, "campaigns", "notice").await?,
            order_field_snapshot: has_column(backend, "orders", "field_snapshot").await?,
            status_logs: has_column(backend, "order_status_logs", "order_id").await?,
        };
        tracing::info!(?caps, "Remote schema checked");
        Ok(caps)
    }

    /// Column list for reading campaigns in the admin console
    pub fn admin_campaign_columns(&self) -> String {
        let mut columns = vec!["id", "slug", "title", "description", "is_active", "custom_fields"];
        if self.campaign_notice {
            columns.push("notice");
        }
        if self.campaign_field_config {
            columns.push("field_config");
        }
        if self.campaign_status_options {
            columns.push("status_options");
        }
        columns.push("created_at");
        columns.join(",")
    }

    /// Column list for reading active campaigns on the public form
    pub fn public_campaign_columns(&self) -> String {
        let mut columns = vec!["id", "slug", "title", "description"];
        if self.campaign_notice {
            columns.push("notice");
        }
        columns.push("custom_fields");
        if self.campaign_field_config {
            columns.push("field_config");
        }
        if self.campaign_status_options {
            columns.push("status_options");
        }
        columns.join(",")
    }
}

async fn has_column(backend: &dyn Backend, table: &str, column: &str) -> ClientResult<bool> {
    let query = Query::new().select(column).limit(0);
    match backend.select(table, &query).await {
        Ok(_) => Ok(true),
        Err(e) if e.is_missing_column() || e.is_missing_relation() => {
            tracing::warn!(table, column, error = %e, "Optional schema part missing");
            Ok(false)
        }
        // Some gateways answer 404 without a code for unknown tables
        Err(ClientError::Api { status: 404, .. }) => Ok(false),
        Err(e) => Err(e),
    }
}
