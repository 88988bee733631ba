//! Public order form API
//!
//! | Path | Method | Purpose |
//! |------|--------|---------|
//! | /api/campaigns | GET | Active campaigns with their visible fields |
//! | /api/campaigns/{id}/orders | POST | Submit an order |
//! | /api/status-lookup | POST | Order status lookup |

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use poster_client::session::order_form::SUBMIT_SUCCESS;
use poster_client::session::{LookupOutcome, PublicCampaign};
use serde::Serialize;
use serde_json::{Map, Value};
use shared::SubmittedValues;
use shared::models::{StatusLookupQuery, value_text};

use crate::error::ServiceResult;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/campaigns", get(list_campaigns))
        .route("/api/campaigns/{id}/orders", post(submit_order))
        .route("/api/status-lookup", post(lookup_status))
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub message: &'static str,
    pub status: String,
}

/// GET /api/campaigns
pub async fn list_campaigns(
    State(state): State<AppState>,
) -> ServiceResult<Json<Vec<PublicCampaign>>> {
    let session = state.order_form().await?;
    Ok(Json(session.public_campaigns()))
}

/// POST /api/campaigns/{id}/orders - form values keyed by field key
pub async fn submit_order(
    State(state): State<AppState>,
    Path(campaign_id): Path<String>,
    Json(body): Json<Map<String, Value>>,
) -> ServiceResult<Json<SubmitResponse>> {
    let values: SubmittedValues = body
        .iter()
        .map(|(key, value)| (key.clone(), value_text(value)))
        .collect();

    let session = state.order_form().await?;
    let order = session.submit(&campaign_id, &values).await?;
    tracing::info!(campaign_id = %campaign_id, status = %order.status, "Order submitted");

    Ok(Json(SubmitResponse {
        message: SUBMIT_SUCCESS,
        status: order.status,
    }))
}

/// POST /api/status-lookup
pub async fn lookup_status(
    State(state): State<AppState>,
    Json(query): Json<StatusLookupQuery>,
) -> ServiceResult<Json<LookupOutcome>> {
    let session = state.order_form().await?;
    Ok(Json(session.lookup(&query).await?))
}
