//! Admin sign-in API (no console required)
//!
//! | Path | Method | Purpose |
//! |------|--------|---------|
//! | /api/admin/sign-in | POST | Email + password sign-in, admins only |
//! | /api/admin/magic-link | POST | Send a one-time sign-in link |
//! | /api/admin/sign-out | POST | Revoke the Bearer token |

use axum::{
    Json, Router,
    extract::State,
    routing::post,
};
use http::HeaderMap;
use poster_client::AuthSession;
use poster_client::session::sign_in as admin_sign_in;
use serde::Serialize;
use shared::error::AppError;
use shared::models::{MagicLinkRequest, SignInRequest};

use crate::auth::bearer_token;
use crate::error::ServiceResult;
use crate::state::AppState;

pub const MAGIC_LINK_SENT: &str = "登入連結已寄出，請至信箱確認。";
pub const SIGNED_OUT: &str = "已登出";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admin/sign-in", post(sign_in))
        .route("/api/admin/magic-link", post(magic_link))
        .route("/api/admin/sign-out", post(sign_out))
}

/// `{"message": ...}` acknowledgement
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// POST /api/admin/sign-in
pub async fn sign_in(
    State(state): State<AppState>,
    Json(req): Json<SignInRequest>,
) -> ServiceResult<Json<AuthSession>> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::validation("請輸入 Email 與密碼").into());
    }
    let session = admin_sign_in(state.backend.as_ref(), &req.email, &req.password).await?;
    tracing::info!(user_id = %session.user.id, "Admin signed in");
    Ok(Json(session))
}

/// POST /api/admin/magic-link
pub async fn magic_link(
    State(state): State<AppState>,
    Json(req): Json<MagicLinkRequest>,
) -> ServiceResult<Json<MessageResponse>> {
    let email = req.email.trim();
    if email.is_empty() {
        return Err(AppError::validation("請輸入 Email")
            .with_detail("field", "email")
            .into());
    }
    state
        .backend
        .send_magic_link(email, req.redirect_to.as_deref())
        .await?;
    Ok(Json(MessageResponse {
        message: MAGIC_LINK_SENT,
    }))
}

/// POST /api/admin/sign-out
pub async fn sign_out(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ServiceResult<Json<MessageResponse>> {
    let token = bearer_token(&headers)?;
    state.backend.sign_out(token).await?;
    Ok(Json(MessageResponse {
        message: SIGNED_OUT,
    }))
}
