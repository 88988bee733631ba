//! Public order form state

use crate::backend::Backend;
use crate::repository::{CampaignRepository, OrderRepository, SettingsRepository};
use crate::schema::SchemaCapabilities;
use crate::{ClientError, ClientResult};
use chrono::FixedOffset;
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::field_config::{base_catalog, merge, visible_fields};
use shared::models::{
    Campaign, FieldDescriptor, OrderInsert, OrderStatusLookupRow, StatusLookupQuery,
};
use shared::status::{default_status_options, resolve_for_campaign};
use shared::validation::{SubmittedValues, build_order_insert, validate_lookup};
use std::sync::Arc;

pub const SUBMIT_SUCCESS: &str = "送出成功，請保留姓名或電話以便查詢。";
pub const NO_ACTIVE_CAMPAIGN: &str = "目前沒有可訂購活動";
pub const LOOKUP_EMPTY: &str = "查無資料，請確認活動與姓名或電話是否正確。";

/// Campaign as rendered on the public form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicCampaign {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub notice: Option<String>,
    /// Visible fields in display order
    pub fields: Vec<FieldDescriptor>,
}

/// Lookup rows plus the message shown above them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookupOutcome {
    pub rows: Vec<OrderStatusLookupRow>,
    pub message: String,
}

/// Public form view-model: active campaigns, the global field defaults and
/// status vocabulary, plus the submit and lookup actions.
///
/// `load()` replaces everything held in memory.
pub struct OrderFormSession {
    campaign_repo: CampaignRepository,
    order_repo: OrderRepository,
    settings_repo: SettingsRepository,
    caps: SchemaCapabilities,
    offset: FixedOffset,
    global_fields: Vec<FieldDescriptor>,
    global_statuses: Vec<String>,
    campaigns: Vec<Campaign>,
}

impl OrderFormSession {
    pub fn new(backend: Arc<dyn Backend>, caps: SchemaCapabilities, offset: FixedOffset) -> Self {
        Self {
            campaign_repo: CampaignRepository::new(backend.clone(), caps),
            order_repo: OrderRepository::new(backend.clone(), caps),
            settings_repo: SettingsRepository::new(backend),
            caps,
            offset,
            global_fields: base_catalog(),
            global_statuses: default_status_options(),
            campaigns: Vec::new(),
        }
    }

    /// Load settings (lenient) and the active campaigns
    pub async fn load(&mut self) -> ClientResult<()> {
        self.global_fields = self.settings_repo.global_field_config_or_base().await;
        self.global_statuses = self.settings_repo.global_status_options_or_default().await;
        self.campaigns = self.campaign_repo.list_active().await?;
        tracing::debug!(campaigns = self.campaigns.len(), "Order form loaded");
        Ok(())
    }

    pub async fn refresh(&mut self) -> ClientResult<()> {
        self.load().await
    }

    pub fn campaigns(&self) -> &[Campaign] {
        &self.campaigns
    }

    pub fn global_fields(&self) -> &[FieldDescriptor] {
        &self.global_fields
    }

    /// Active campaign by id
    pub fn campaign(&self, id: &str) -> Option<&Campaign> {
        self.campaigns.iter().find(|c| c.id == id)
    }

    /// Resolved field configuration of a campaign
    pub fn field_config(&self, campaign: &Campaign) -> Vec<FieldDescriptor> {
        merge(
            &campaign.field_config,
            &self.global_fields,
            &campaign.custom_fields,
        )
    }

    pub fn status_options(&self, campaign: &Campaign) -> Vec<String> {
        resolve_for_campaign(&campaign.status_options, &self.global_statuses)
    }

    pub fn public_campaigns(&self) -> Vec<PublicCampaign> {
        self.campaigns
            .iter()
            .map(|c| PublicCampaign {
                id: c.id.clone(),
                slug: c.slug.clone(),
                title: c.title.clone(),
                description: c.description.clone(),
                notice: c.notice.clone(),
                fields: visible_fields(&self.field_config(c)),
            })
            .collect()
    }

    /// Validate and insert an order for an active campaign
    pub async fn submit(
        &self,
        campaign_id: &str,
        values: &SubmittedValues,
    ) -> ClientResult<OrderInsert> {
        let campaign = self.campaign(campaign_id).ok_or_else(|| {
            ClientError::App(
                AppError::with_message(ErrorCode::CampaignNotFound, NO_ACTIVE_CAMPAIGN)
                    .with_detail("field", "campaign_id"),
            )
        })?;

        let payload = build_order_insert(
            &campaign.id,
            &self.field_config(campaign),
            values,
            &self.status_options(campaign),
            self.offset,
            self.caps.order_field_snapshot,
        )?;
        self.order_repo.insert(payload.clone()).await?;
        Ok(payload)
    }

    /// Status lookup by campaign slug and name and/or phone
    pub async fn lookup(&self, query: &StatusLookupQuery) -> ClientResult<LookupOutcome> {
        let params = validate_lookup(query)?;
        let rows = self.order_repo.lookup_status(&params).await?;
        let message = if rows.is_empty() {
            LOOKUP_EMPTY.to_string()
        } else {
            format!("查詢成功，共 {} 筆。", rows.len())
        };
        Ok(LookupOutcome { rows, message })
    }
}
