//! Admin authentication middleware
//!
//! Every admin request carries the backend access token as a Bearer token.
//! Membership in `admins` is re-checked per request; the authorized and
//! loaded console is handed to the handler as an extension.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::HeaderMap;
use shared::error::AppError;

use crate::error::ServiceError;
use crate::state::AppState;

/// Access token from `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let header = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::invalid_token("Missing Authorization header"))?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::invalid_token("Invalid Authorization format"))
}

/// Authorize the caller as an admin and inject its `AdminConsole`
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    if request.method() == http::Method::OPTIONS {
        return Ok(next.run(request).await);
    }

    let token = bearer_token(request.headers())?.to_string();
    let console = state.admin_console(&token).await?;
    tracing::debug!(user_id = %console.user().id, "Admin request authorized");

    request.extensions_mut().insert(console);
    Ok(next.run(request).await)
}
