//! API routes for poster-server

pub mod admin;
pub mod health;
pub mod public;
pub mod session;

use crate::auth::require_admin;
use crate::config::Config;
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::{Router, middleware};
use http::{HeaderValue, Method};
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Create the combined router (no tower middleware)
pub fn create_router(state: AppState) -> Router {
    // Admin console (Bearer token of an admin)
    let admin = admin::router().layer(middleware::from_fn_with_state(
        state.clone(),
        require_admin,
    ));

    Router::new()
        .merge(health::router())
        .merge(public::router())
        .merge(session::router())
        .merge(admin)
        .with_state(state)
}

/// Router with tracing, CORS, compression, timeouts and request ids
pub fn build_app(state: AppState, config: &Config) -> Router {
    create_router(state)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(TimeoutLayer::with_status_code(
            http::StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(cors_layer(config.cors_allow_origin.as_deref()))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(Any);

    match origin.and_then(|o| HeaderValue::from_str(o).ok()) {
        Some(origin) => base.allow_origin(origin),
        None => {
            tracing::warn!("CORS_ALLOW_ORIGIN not set, allowing any origin");
            base.allow_origin(Any)
        }
    }
}
