//! Admin console state
//!
//! Construction goes through [`AdminConsole::open`], which verifies the
//! access token and the `admins` membership. A signed-in user who is not an
//! admin is signed out immediately.

use crate::auth::{AuthSession, AuthUser};
use crate::backend::Backend;
use crate::repository::{
    AdminRepository, CampaignRepository, OrderRepository, SettingsRepository, StatusLogPage,
    StatusLogRepository,
};
use crate::schema::SchemaCapabilities;
use crate::{ClientError, ClientResult};
use chrono::{FixedOffset, NaiveDate};
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::export::{export_filename, orders_to_csv};
use shared::field_config::{
    FieldEdit, apply_field_edit, base_catalog, label_map, merge, parse_custom_fields,
};
use shared::models::{
    Campaign, CampaignCreate, CampaignSettings, CampaignUpdate, FieldDescriptor,
    MAX_DESCRIPTION_CHARS, NewCampaign, Order, OrderEdit,
};
use shared::slug::generate_slug;
use shared::status::{
    StatusEdit, StatusScope, apply_status_edit, default_status_options, resolve_for_campaign,
    validate_campaign_for_save,
};
use shared::util::{now_utc, to_local_input};
use shared::validation::validate_order_edit;
use std::sync::Arc;

/// Result of creating a campaign
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedCampaign {
    pub id: Option<String>,
    pub slug: String,
    pub message: String,
}

/// Rendered CSV download
#[derive(Debug, Clone, PartialEq)]
pub struct CsvExport {
    pub filename: String,
    pub body: String,
}

fn campaign_error(code: ErrorCode, message: &str, field: &str) -> ClientError {
    ClientError::App(AppError::with_message(code, message).with_detail("field", field))
}

fn check_field_index(fields: &[FieldDescriptor], index: usize) -> ClientResult<()> {
    if index >= fields.len() {
        return Err(ClientError::App(
            AppError::with_message(ErrorCode::NotFound, "找不到欄位").with_detail("index", index),
        ));
    }
    Ok(())
}

/// Update payload that rewrites `campaign` as loaded
fn unchanged(campaign: &Campaign) -> CampaignUpdate {
    CampaignUpdate {
        title: campaign.title.clone(),
        description: campaign.description.clone(),
        notice: campaign.notice.clone(),
        is_active: campaign.is_active,
        custom_fields: campaign.custom_fields.clone(),
        field_config: Some(campaign.field_config.clone()),
        status_options: Some(campaign.status_options.clone()),
    }
}

fn check_description(description: &str) -> ClientResult<()> {
    if description.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(campaign_error(
            ErrorCode::CampaignDescriptionTooLong,
            "活動說明不可超過 3000 字",
            "description",
        ));
    }
    Ok(())
}

/// Sign in with email and password; non-admins are signed out again
pub async fn sign_in(
    backend: &dyn Backend,
    email: &str,
    password: &str,
) -> ClientResult<AuthSession> {
    let session = backend
        .sign_in_with_password(email.trim(), password)
        .await?;
    authorize(backend, &session.access_token).await?;
    Ok(session)
}

/// Verify `access_token` belongs to an admin
pub async fn authorize(backend: &dyn Backend, access_token: &str) -> ClientResult<AuthUser> {
    let user = backend.get_user(access_token).await?;
    let scoped = backend.with_access_token(access_token);
    let is_admin = match user.email.as_deref() {
        Some(email) => AdminRepository::new(scoped).is_admin(email).await?,
        None => false,
    };

    if !is_admin {
        tracing::warn!(user_id = %user.id, "Signed-in user is not an admin");
        if let Err(e) = backend.sign_out(access_token).await {
            tracing::warn!(error = %e, "Sign-out of non-admin session failed");
        }
        return Err(ClientError::NotAdmin);
    }
    Ok(user)
}

/// Admin console view-model
#[derive(Clone)]
pub struct AdminConsole {
    backend: Arc<dyn Backend>,
    user: AuthUser,
    access_token: String,
    offset: FixedOffset,
    campaign_repo: CampaignRepository,
    order_repo: OrderRepository,
    settings_repo: SettingsRepository,
    log_repo: StatusLogRepository,
    global_fields: Vec<FieldDescriptor>,
    global_statuses: Vec<String>,
    campaigns: Vec<Campaign>,
}

impl AdminConsole {
    /// Authorize the token and build a console acting as that user
    pub async fn open(
        backend: Arc<dyn Backend>,
        caps: SchemaCapabilities,
        offset: FixedOffset,
        access_token: &str,
    ) -> ClientResult<Self> {
        let user = authorize(backend.as_ref(), access_token).await?;
        let scoped = backend.with_access_token(access_token);

        Ok(Self {
            campaign_repo: CampaignRepository::new(scoped.clone(), caps),
            order_repo: OrderRepository::new(scoped.clone(), caps),
            settings_repo: SettingsRepository::new(scoped.clone()),
            log_repo: StatusLogRepository::new(scoped, caps),
            backend,
            user,
            access_token: access_token.to_string(),
            offset,
            global_fields: base_catalog(),
            global_statuses: default_status_options(),
            campaigns: Vec::new(),
        })
    }

    pub fn user(&self) -> &AuthUser {
        &self.user
    }

    /// Load global settings (lenient) and every campaign
    pub async fn load(&mut self) -> ClientResult<()> {
        self.global_fields = self.settings_repo.global_field_config_or_base().await;
        self.global_statuses = self.settings_repo.global_status_options_or_default().await;
        self.reload_campaigns().await
    }

    pub async fn refresh(&mut self) -> ClientResult<()> {
        self.load().await
    }

    pub async fn reload_campaigns(&mut self) -> ClientResult<()> {
        self.campaigns = self.campaign_repo.list_all().await?;
        Ok(())
    }

    pub async fn sign_out(self) -> ClientResult<()> {
        self.backend.sign_out(&self.access_token).await
    }

    pub fn campaigns(&self) -> &[Campaign] {
        &self.campaigns
    }

    pub fn campaign(&self, id: &str) -> ClientResult<&Campaign> {
        self.campaigns
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| campaign_error(ErrorCode::CampaignNotFound, "請先選擇活動", "campaign_id"))
    }

    pub fn global_field_config(&self) -> &[FieldDescriptor] {
        &self.global_fields
    }

    pub fn global_status_options(&self) -> &[String] {
        &self.global_statuses
    }

    /// Resolved field configuration of a campaign
    pub fn campaign_field_config(&self, campaign: &Campaign) -> Vec<FieldDescriptor> {
        merge(
            &campaign.field_config,
            &self.global_fields,
            &campaign.custom_fields,
        )
    }

    pub fn campaign_status_options(&self, campaign: &Campaign) -> Vec<String> {
        resolve_for_campaign(&campaign.status_options, &self.global_statuses)
    }

    fn today(&self) -> NaiveDate {
        now_utc().with_timezone(&self.offset).date_naive()
    }

    // ========== Campaigns ==========

    /// Create a campaign, then reload the list.
    ///
    /// The reload is a separate step; when it fails the campaign still exists.
    pub async fn create_campaign(&mut self, input: &NewCampaign) -> ClientResult<CreatedCampaign> {
        let title = input.title.trim();
        let description = input.description.trim();
        let custom_fields = parse_custom_fields(&input.custom_fields_json).map_err(AppError::from)?;
        if title.is_empty() {
            return Err(campaign_error(
                ErrorCode::CampaignTitleRequired,
                "請輸入活動標題",
                "title",
            ));
        }
        check_description(description)?;

        let taken: Vec<String> = self.campaigns.iter().map(|c| c.slug.clone()).collect();
        let slug = generate_slug(title, self.today(), |s| taken.iter().any(|t| t == s));
        let field_config = merge(&[], &self.global_fields, &custom_fields);

        let id = self
            .campaign_repo
            .create(CampaignCreate {
                slug: slug.clone(),
                title: title.to_string(),
                description: description.to_string(),
                custom_fields,
                field_config: Some(field_config),
                status_options: Some(Vec::new()),
                is_active: true,
            })
            .await?;

        self.reload_campaigns().await?;
        Ok(CreatedCampaign {
            id,
            message: format!("活動建立完成（代碼：{}）。", slug),
            slug,
        })
    }

    /// Save the settings form of one campaign, then reload the list
    pub async fn save_campaign_settings(
        &mut self,
        campaign_id: &str,
        settings: &CampaignSettings,
    ) -> ClientResult<Campaign> {
        let campaign_id = self.campaign(campaign_id)?.id.clone();

        let title = settings.title.trim();
        let description = settings.description.trim();
        let custom_fields =
            parse_custom_fields(&settings.custom_fields_json).map_err(AppError::from)?;
        if title.is_empty() {
            return Err(campaign_error(
                ErrorCode::CampaignTitleRequired,
                "活動標題不可空白",
                "title",
            ));
        }
        check_description(description)?;

        let field_config = merge(&settings.field_config, &self.global_fields, &custom_fields);
        let status_options =
            validate_campaign_for_save(&settings.status_options, settings.use_global_status)?;

        self.campaign_repo
            .update(
                &campaign_id,
                CampaignUpdate {
                    title: title.to_string(),
                    description: description.to_string(),
                    notice: settings.notice.as_deref().map(|n| n.trim().to_string()),
                    is_active: settings.is_active,
                    custom_fields,
                    field_config: Some(field_config),
                    status_options: Some(status_options),
                },
            )
            .await?;

        self.reload_campaigns().await?;
        self.campaign(&campaign_id).cloned()
    }

    /// Apply one field editor operation to a campaign's resolved fields and save
    pub async fn edit_campaign_field(
        &mut self,
        campaign_id: &str,
        index: usize,
        edit: FieldEdit,
    ) -> ClientResult<Campaign> {
        let campaign = self.campaign(campaign_id)?.clone();
        let mut fields = self.campaign_field_config(&campaign);
        check_field_index(&fields, index)?;
        if !apply_field_edit(&mut fields, index, edit) {
            return Ok(campaign);
        }

        let update = CampaignUpdate {
            field_config: Some(merge(&fields, &self.global_fields, &campaign.custom_fields)),
            ..unchanged(&campaign)
        };
        self.campaign_repo.update(&campaign.id, update).await?;
        self.reload_campaigns().await?;
        self.campaign(&campaign.id).cloned()
    }

    /// Apply one status editor operation to a campaign.
    ///
    /// A campaign inheriting the global list starts from a copy of it, so the
    /// result is always a custom list.
    pub async fn edit_campaign_status(
        &mut self,
        campaign_id: &str,
        edit: StatusEdit,
    ) -> ClientResult<Campaign> {
        let campaign = self.campaign(campaign_id)?.clone();
        let current = self.campaign_status_options(&campaign);
        let next = apply_status_edit(&current, StatusScope::Campaign, edit);
        let status_options = validate_campaign_for_save(&next, false)?;

        let update = CampaignUpdate {
            status_options: Some(status_options),
            ..unchanged(&campaign)
        };
        self.campaign_repo.update(&campaign.id, update).await?;
        self.reload_campaigns().await?;
        self.campaign(&campaign.id).cloned()
    }

    // ========== Global settings ==========

    pub async fn save_global_field_config(
        &mut self,
        config: &[FieldDescriptor],
    ) -> ClientResult<Vec<FieldDescriptor>> {
        self.global_fields = self.settings_repo.save_global_field_config(config).await?;
        Ok(self.global_fields.clone())
    }

    pub async fn save_global_status_options(
        &mut self,
        options: &[String],
    ) -> ClientResult<Vec<String>> {
        self.global_statuses = self.settings_repo.save_global_status_options(options).await?;
        Ok(self.global_statuses.clone())
    }

    /// Apply one field editor operation to the global defaults and save
    pub async fn edit_global_field(
        &mut self,
        index: usize,
        edit: FieldEdit,
    ) -> ClientResult<Vec<FieldDescriptor>> {
        let mut fields = self.global_fields.clone();
        check_field_index(&fields, index)?;
        if !apply_field_edit(&mut fields, index, edit) {
            return Ok(fields);
        }
        self.save_global_field_config(&fields).await
    }

    /// Apply one status editor operation to the global list and save
    pub async fn edit_global_status(&mut self, edit: StatusEdit) -> ClientResult<Vec<String>> {
        let next = apply_status_edit(&self.global_statuses, StatusScope::Global, edit);
        self.save_global_status_options(&next).await
    }

    // ========== Orders ==========

    pub async fn orders(&self, campaign_id: &str) -> ClientResult<Vec<Order>> {
        self.order_repo.list_for_campaign(campaign_id).await
    }

    async fn existing_order(&self, order_id: &str) -> ClientResult<Order> {
        self.order_repo.get(order_id).await?.ok_or_else(|| {
            ClientError::App(AppError::with_message(ErrorCode::OrderNotFound, "找不到訂單"))
        })
    }

    /// Edit form of one order, prefilled from the stored row
    pub async fn order_edit_form(&self, order_id: &str) -> ClientResult<OrderEdit> {
        let order = self.existing_order(order_id).await?;
        let campaign = self.campaign(&order.campaign_id)?;
        let custom_values = campaign
            .custom_fields
            .iter()
            .map(|field| (field.key.clone(), order.extra_text(&field.key)))
            .collect();

        Ok(OrderEdit {
            customer_name: order.customer_name.clone(),
            phone: order.phone.clone(),
            email: order.email.clone(),
            quantity: order.quantity.to_string(),
            transfer_account: order.transfer_account.clone(),
            transfer_time: order
                .transfer_time
                .as_ref()
                .map(|t| to_local_input(t, self.offset))
                .unwrap_or_default(),
            transaction_method: order.transaction_method.clone(),
            note: order.note.clone(),
            status: order.status.clone(),
            custom_values,
        })
    }

    /// Validate and save an admin edit of one order
    pub async fn update_order(&self, order_id: &str, edit: &OrderEdit) -> ClientResult<Order> {
        let existing = self.existing_order(order_id).await?;
        let campaign = self.campaign(&existing.campaign_id)?;

        let update = validate_order_edit(
            &existing,
            edit,
            &campaign.custom_fields,
            &self.campaign_status_options(campaign),
            self.offset,
        )?;
        self.order_repo.update(order_id, &update).await?;

        Ok(Order {
            customer_name: update.customer_name,
            phone: update.phone,
            email: update.email,
            quantity: update.quantity,
            transfer_account: update.transfer_account,
            transfer_time: Some(update.transfer_time),
            transaction_method: update.transaction_method,
            note: update.note,
            status: update.status,
            extra_data: update.extra_data,
            ..existing
        })
    }

    /// Change only the status of one order
    pub async fn set_order_status(&self, order_id: &str, status: &str) -> ClientResult<()> {
        let existing = self.existing_order(order_id).await?;
        let campaign = self.campaign(&existing.campaign_id)?;
        let status = status.trim();
        if !self.campaign_status_options(campaign).iter().any(|s| s == status) {
            return Err(ClientError::App(
                AppError::with_message(ErrorCode::OrderInvalidStatus, "狀態錯誤")
                    .with_detail("field", "status"),
            ));
        }
        self.order_repo.set_status(order_id, status).await
    }

    pub async fn delete_order(&self, order_id: &str) -> ClientResult<()> {
        self.order_repo.delete(order_id).await
    }

    /// CSV of one campaign's orders
    pub async fn export_csv(&self, campaign_id: &str) -> ClientResult<CsvExport> {
        let campaign = self.campaign(campaign_id)?;
        let orders = self.orders(campaign_id).await?;
        let labels = label_map(&self.campaign_field_config(campaign), &campaign.custom_fields);
        let body = orders_to_csv(Some(campaign), &orders, &labels, self.offset)?;
        Ok(CsvExport {
            filename: export_filename(Some(&campaign.slug), self.today()),
            body,
        })
    }

    pub async fn status_logs(&self, campaign_id: &str) -> ClientResult<StatusLogPage> {
        self.log_repo.list_for_campaign(campaign_id).await
    }
}
