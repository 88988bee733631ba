//! `campaigns` table

use super::TABLE_CAMPAIGNS;
use crate::backend::{Backend, decode_rows, encode};
use crate::query::Query;
use crate::schema::SchemaCapabilities;
use crate::ClientResult;
use shared::models::{Campaign, CampaignCreate, CampaignUpdate};
use std::sync::Arc;

#[derive(Clone)]
pub struct CampaignRepository {
    backend: Arc<dyn Backend>,
    caps: SchemaCapabilities,
}

impl CampaignRepository {
    pub fn new(backend: Arc<dyn Backend>, caps: SchemaCapabilities) -> Self {
        Self { backend, caps }
    }

    /// Active campaigns for the public form, newest first
    pub async fn list_active(&self) -> ClientResult<Vec<Campaign>> {
        let query = Query::new()
            .select(&self.caps.public_campaign_columns())
            .eq("is_active", true)
            .order_desc("created_at");
        decode_rows(self.backend.select(TABLE_CAMPAIGNS, &query).await?)
    }

    /// Every campaign for the admin console, newest first
    pub async fn list_all(&self) -> ClientResult<Vec<Campaign>> {
        let query = Query::new()
            .select(&self.caps.admin_campaign_columns())
            .order_desc("created_at");
        decode_rows(self.backend.select(TABLE_CAMPAIGNS, &query).await?)
    }

    /// Insert a campaign and return its id when the backend reports one
    pub async fn create(&self, mut payload: CampaignCreate) -> ClientResult<Option<String>> {
        if !self.caps.campaign_field_config {
            payload.field_config = None;
        }
        if !self.caps.campaign_status_options {
            payload.status_options = None;
        }

        let rows = self
            .backend
            .insert(TABLE_CAMPAIGNS, encode(&payload)?, true)
            .await?;
        let id = rows
            .first()
            .and_then(|row| row.get("id"))
            .and_then(|id| match id {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            });
        tracing::info!(slug = %payload.slug, id = ?id, "Campaign created");
        Ok(id)
    }

    pub async fn update(&self, id: &str, mut payload: CampaignUpdate) -> ClientResult<()> {
        if !self.caps.campaign_field_config {
            payload.field_config = None;
        }
        if !self.caps.campaign_status_options {
            payload.status_options = None;
        }
        if !self.caps.campaign_notice {
            payload.notice = None;
        }

        let query = Query::new().eq("id", id);
        self.backend
            .update(TABLE_CAMPAIGNS, &query, encode(&payload)?)
            .await?;
        tracing::info!(id, "Campaign updated");
        Ok(())
    }
}
