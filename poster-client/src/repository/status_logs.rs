//! `order_status_logs` (read only)

use super::TABLE_STATUS_LOGS;
use crate::backend::{Backend, decode_rows};
use crate::query::Query;
use crate::schema::SchemaCapabilities;
use crate::ClientResult;
use serde::Serialize;
use shared::models::OrderStatusLog;
use std::sync::Arc;

/// Rows shown per campaign
pub const STATUS_LOG_LIMIT: usize = 200;

/// Shown instead of an error when the log table is absent
pub const STATUS_LOGS_UNAVAILABLE: &str = "尚未啟用狀態紀錄表，請先重跑 schema.sql。";

/// Logs plus an optional notice for the console
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatusLogPage {
    pub logs: Vec<OrderStatusLog>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl StatusLogPage {
    fn unavailable() -> Self {
        Self {
            logs: Vec::new(),
            notice: Some(STATUS_LOGS_UNAVAILABLE.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct StatusLogRepository {
    backend: Arc<dyn Backend>,
    caps: SchemaCapabilities,
}

impl StatusLogRepository {
    pub fn new(backend: Arc<dyn Backend>, caps: SchemaCapabilities) -> Self {
        Self { backend, caps }
    }

    /// Newest status changes of one campaign
    pub async fn list_for_campaign(&self, campaign_id: &str) -> ClientResult<StatusLogPage> {
        if !self.caps.status_logs {
            return Ok(StatusLogPage::unavailable());
        }

        let query = Query::new()
            .select("order_id,old_status,new_status,changed_by,changed_at")
            .eq("campaign_id", campaign_id)
            .order_desc("changed_at")
            .limit(STATUS_LOG_LIMIT);
        match self.backend.select(TABLE_STATUS_LOGS, &query).await {
            Ok(rows) => Ok(StatusLogPage {
                logs: decode_rows(rows)?,
                notice: None,
            }),
            Err(e) if e.is_missing_relation() => {
                tracing::warn!(error = %e, "Status log table missing");
                Ok(StatusLogPage::unavailable())
            }
            Err(e) => Err(e),
        }
    }
}
