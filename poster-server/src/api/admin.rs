//! Admin console API
//!
//! All routes require `Authorization: Bearer <access token>` of a user listed
//! in `admins`; see [`crate::auth::require_admin`].
//!
//! | Path | Method | Purpose |
//! |------|--------|---------|
//! | /api/admin/me | GET | Signed-in admin |
//! | /api/admin/campaigns | GET / POST | List / create campaigns |
//! | /api/admin/campaigns/{id} | GET / PUT | Campaign with resolved settings / save settings |
//! | /api/admin/campaigns/{id}/fields/{index} | PATCH | One field editor operation |
//! | /api/admin/campaigns/{id}/statuses | PATCH | One status editor operation |
//! | /api/admin/campaigns/{id}/orders | GET | Orders of a campaign |
//! | /api/admin/campaigns/{id}/export | GET | CSV download |
//! | /api/admin/campaigns/{id}/status-logs | GET | Recent status changes |
//! | /api/admin/settings/fields | GET / PUT | Global field defaults |
//! | /api/admin/settings/fields/{index} | PATCH | One field editor operation |
//! | /api/admin/settings/statuses | GET / PUT / PATCH | Global status list / one editor operation |
//! | /api/admin/orders/{id} | GET / PUT / DELETE | Edit form / save edit / delete an order |
//! | /api/admin/orders/{id}/status | PATCH | Change only the status |

use axum::{
    Extension, Json, Router,
    extract::Path,
    response::{IntoResponse, Response},
    routing::{get, patch},
};
use http::header;
use poster_client::repository::StatusLogPage;
use poster_client::session::CreatedCampaign;
use poster_client::{AdminConsole, AuthUser};
use serde::{Deserialize, Serialize};
use shared::field_config::FieldEdit;
use shared::models::{Campaign, CampaignSettings, FieldDescriptor, NewCampaign, Order, OrderEdit};
use shared::status::StatusEdit;

use super::session::MessageResponse;
use crate::error::ServiceResult;
use crate::state::AppState;

pub const ORDER_DELETED: &str = "訂單已刪除";
pub const STATUS_UPDATED: &str = "狀態已更新";

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/admin", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/campaigns", get(list_campaigns).post(create_campaign))
        .route("/campaigns/{id}", get(get_campaign).put(save_campaign))
        .route("/campaigns/{id}/fields/{index}", patch(edit_campaign_field))
        .route("/campaigns/{id}/statuses", patch(edit_campaign_status))
        .route("/campaigns/{id}/orders", get(list_orders))
        .route("/campaigns/{id}/export", get(export_csv))
        .route("/campaigns/{id}/status-logs", get(status_logs))
        .route(
            "/settings/fields",
            get(global_fields).put(save_global_fields),
        )
        .route("/settings/fields/{index}", patch(edit_global_field))
        .route(
            "/settings/statuses",
            get(global_statuses)
                .put(save_global_statuses)
                .patch(edit_global_status),
        )
        .route(
            "/orders/{id}",
            get(order_edit_form).put(update_order).delete(delete_order),
        )
        .route("/orders/{id}/status", patch(set_order_status))
}

/// Campaign row plus what the console derives from it
#[derive(Debug, Serialize)]
pub struct CampaignDetail {
    #[serde(flatten)]
    pub campaign: Campaign,
    /// Merged field configuration in display order
    pub resolved_fields: Vec<FieldDescriptor>,
    /// Campaign statuses, or the global list when it has none
    pub resolved_status_options: Vec<String>,
}

impl CampaignDetail {
    fn new(console: &AdminConsole, campaign: &Campaign) -> Self {
        Self {
            resolved_fields: console.campaign_field_config(campaign),
            resolved_status_options: console.campaign_status_options(campaign),
            campaign: campaign.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusOptionsBody {
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusChange {
    pub status: String,
}

/// GET /api/admin/me
pub async fn me(Extension(console): Extension<AdminConsole>) -> Json<AuthUser> {
    Json(console.user().clone())
}

// ========== Campaigns ==========

/// GET /api/admin/campaigns - newest first, inactive included
pub async fn list_campaigns(
    Extension(console): Extension<AdminConsole>,
) -> Json<Vec<CampaignDetail>> {
    Json(
        console
            .campaigns()
            .iter()
            .map(|c| CampaignDetail::new(&console, c))
            .collect(),
    )
}

/// POST /api/admin/campaigns
pub async fn create_campaign(
    Extension(mut console): Extension<AdminConsole>,
    Json(input): Json<NewCampaign>,
) -> ServiceResult<Json<CreatedCampaign>> {
    let created = console.create_campaign(&input).await?;
    tracing::info!(slug = %created.slug, "Campaign created");
    Ok(Json(created))
}

/// GET /api/admin/campaigns/{id}
pub async fn get_campaign(
    Extension(console): Extension<AdminConsole>,
    Path(id): Path<String>,
) -> ServiceResult<Json<CampaignDetail>> {
    let campaign = console.campaign(&id)?;
    Ok(Json(CampaignDetail::new(&console, campaign)))
}

/// PUT /api/admin/campaigns/{id}
pub async fn save_campaign(
    Extension(mut console): Extension<AdminConsole>,
    Path(id): Path<String>,
    Json(settings): Json<CampaignSettings>,
) -> ServiceResult<Json<CampaignDetail>> {
    let campaign = console.save_campaign_settings(&id, &settings).await?;
    Ok(Json(CampaignDetail::new(&console, &campaign)))
}

/// PATCH /api/admin/campaigns/{id}/fields/{index}
pub async fn edit_campaign_field(
    Extension(mut console): Extension<AdminConsole>,
    Path((id, index)): Path<(String, usize)>,
    Json(edit): Json<FieldEdit>,
) -> ServiceResult<Json<CampaignDetail>> {
    let campaign = console.edit_campaign_field(&id, index, edit).await?;
    Ok(Json(CampaignDetail::new(&console, &campaign)))
}

/// PATCH /api/admin/campaigns/{id}/statuses
pub async fn edit_campaign_status(
    Extension(mut console): Extension<AdminConsole>,
    Path(id): Path<String>,
    Json(edit): Json<StatusEdit>,
) -> ServiceResult<Json<CampaignDetail>> {
    let campaign = console.edit_campaign_status(&id, edit).await?;
    Ok(Json(CampaignDetail::new(&console, &campaign)))
}

/// GET /api/admin/campaigns/{id}/orders
pub async fn list_orders(
    Extension(console): Extension<AdminConsole>,
    Path(id): Path<String>,
) -> ServiceResult<Json<Vec<Order>>> {
    console.campaign(&id)?;
    Ok(Json(console.orders(&id).await?))
}

/// GET /api/admin/campaigns/{id}/export - UTF-8 CSV with BOM
pub async fn export_csv(
    Extension(console): Extension<AdminConsole>,
    Path(id): Path<String>,
) -> ServiceResult<Response> {
    let export = console.export_csv(&id).await?;
    let disposition = format!("attachment; filename=\"{}\"", export.filename);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.body,
    )
        .into_response())
}

/// GET /api/admin/campaigns/{id}/status-logs
pub async fn status_logs(
    Extension(console): Extension<AdminConsole>,
    Path(id): Path<String>,
) -> ServiceResult<Json<StatusLogPage>> {
    console.campaign(&id)?;
    Ok(Json(console.status_logs(&id).await?))
}

// ========== Global settings ==========

/// GET /api/admin/settings/fields
pub async fn global_fields(
    Extension(console): Extension<AdminConsole>,
) -> Json<Vec<FieldDescriptor>> {
    Json(console.global_field_config().to_vec())
}

/// PUT /api/admin/settings/fields
pub async fn save_global_fields(
    Extension(mut console): Extension<AdminConsole>,
    Json(config): Json<Vec<FieldDescriptor>>,
) -> ServiceResult<Json<Vec<FieldDescriptor>>> {
    Ok(Json(console.save_global_field_config(&config).await?))
}

/// PATCH /api/admin/settings/fields/{index}
pub async fn edit_global_field(
    Extension(mut console): Extension<AdminConsole>,
    Path(index): Path<usize>,
    Json(edit): Json<FieldEdit>,
) -> ServiceResult<Json<Vec<FieldDescriptor>>> {
    Ok(Json(console.edit_global_field(index, edit).await?))
}

/// GET /api/admin/settings/statuses
pub async fn global_statuses(Extension(console): Extension<AdminConsole>) -> Json<Vec<String>> {
    Json(console.global_status_options().to_vec())
}

/// PUT /api/admin/settings/statuses
pub async fn save_global_statuses(
    Extension(mut console): Extension<AdminConsole>,
    Json(body): Json<StatusOptionsBody>,
) -> ServiceResult<Json<Vec<String>>> {
    Ok(Json(console.save_global_status_options(&body.options).await?))
}

/// PATCH /api/admin/settings/statuses
pub async fn edit_global_status(
    Extension(mut console): Extension<AdminConsole>,
    Json(edit): Json<StatusEdit>,
) -> ServiceResult<Json<Vec<String>>> {
    Ok(Json(console.edit_global_status(edit).await?))
}

// ========== Orders ==========

/// GET /api/admin/orders/{id} - stored values in edit-form shape
pub async fn order_edit_form(
    Extension(console): Extension<AdminConsole>,
    Path(id): Path<String>,
) -> ServiceResult<Json<OrderEdit>> {
    Ok(Json(console.order_edit_form(&id).await?))
}

/// PUT /api/admin/orders/{id}
pub async fn update_order(
    Extension(console): Extension<AdminConsole>,
    Path(id): Path<String>,
    Json(edit): Json<OrderEdit>,
) -> ServiceResult<Json<Order>> {
    Ok(Json(console.update_order(&id, &edit).await?))
}

/// PATCH /api/admin/orders/{id}/status
pub async fn set_order_status(
    Extension(console): Extension<AdminConsole>,
    Path(id): Path<String>,
    Json(change): Json<StatusChange>,
) -> ServiceResult<Json<MessageResponse>> {
    console.set_order_status(&id, &change.status).await?;
    Ok(Json(MessageResponse {
        message: STATUS_UPDATED,
    }))
}

/// DELETE /api/admin/orders/{id}
pub async fn delete_order(
    Extension(console): Extension<AdminConsole>,
    Path(id): Path<String>,
) -> ServiceResult<Json<MessageResponse>> {
    console.delete_order(&id).await?;
    tracing::info!(order_id = %id, "Order deleted");
    Ok(Json(MessageResponse {
        message: ORDER_DELETED,
    }))
}
