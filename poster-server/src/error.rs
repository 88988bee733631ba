//! Unified service-layer error type for poster-server
//!
//! `ServiceError` lets handlers `?` both backend client errors and business
//! errors, converting to the API-layer `AppError` at the response boundary.

use axum::response::IntoResponse;
use poster_client::ClientError;
use shared::error::AppError;

/// Service-layer error
///
/// - `Client`: backend call failures (logged, mapped by HTTP status / transport kind)
/// - `App`: business-rule errors (transparent pass-through to the caller)
#[derive(Debug)]
pub enum ServiceError {
    Client(ClientError),
    App(AppError),
}

impl From<ClientError> for ServiceError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::App(app) => ServiceError::App(app),
            other => ServiceError::Client(other),
        }
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Client(client_err) => {
                match &client_err {
                    ClientError::NotAdmin | ClientError::Unauthorized => {
                        tracing::debug!(error = %client_err, "Admin request rejected");
                    }
                    _ => tracing::warn!(error = %client_err, "Backend request failed"),
                }
                client_err.into()
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Convenience type alias for service-layer results
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;

    #[test]
    fn test_client_errors_map_to_app_errors() {
        let err: AppError = ServiceError::from(ClientError::NotAdmin).into();
        assert_eq!(err.code, ErrorCode::AdminRequired);
        assert_eq!(err.http_status(), http::StatusCode::FORBIDDEN);

        let err: AppError = ServiceError::from(ClientError::Api {
            status: 409,
            code: Some("23505".into()),
            message: "duplicate key".into(),
        })
        .into();
        assert_eq!(err.code, ErrorCode::AlreadyExists);
        assert_eq!(err.message, "duplicate key");
    }

    #[test]
    fn test_validation_errors_pass_through() {
        let app = AppError::validation("請輸入姓名").with_detail("field", "customer_name");
        let err = ServiceError::from(ClientError::App(app.clone()));
        assert!(matches!(err, ServiceError::App(_)));
        assert_eq!(AppError::from(err), app);
    }
}
