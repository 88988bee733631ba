//! Client error types

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// PostgreSQL / PostgREST codes for an unknown table
const MISSING_RELATION_CODES: [&str; 2] = ["42P01", "PGRST205"];
/// PostgreSQL / PostgREST codes for an unknown column
const MISSING_COLUMN_CODES: [&str; 2] = ["42703", "PGRST204"];

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend rejected the request; `message` is the remote text verbatim
    #[error("{message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// No signed-in session
    #[error("Authentication required")]
    Unauthorized,

    /// Signed in, but not listed in `admins`
    #[error("此帳號沒有管理權限")]
    NotAdmin,

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Domain rule rejected the input before any remote call
    #[error(transparent)]
    App(#[from] AppError),
}

impl ClientError {
    fn remote_code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// The referenced table does not exist on the backend
    pub fn is_missing_relation(&self) -> bool {
        self.remote_code()
            .is_some_and(|code| MISSING_RELATION_CODES.contains(&code))
    }

    /// A referenced column does not exist on the backend
    pub fn is_missing_column(&self) -> bool {
        self.remote_code()
            .is_some_and(|code| MISSING_COLUMN_CODES.contains(&code))
    }
}

impl From<shared::FieldError> for ClientError {
    fn from(err: shared::FieldError) -> Self {
        Self::App(err.into())
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::App(app) => app,
            ClientError::NotAdmin => AppError::admin_required(),
            ClientError::Unauthorized => AppError::not_authenticated(),
            ClientError::Api {
                status,
                code,
                message,
            } => {
                let error_code = match status {
                    400 | 422
                        if matches!(
                            code.as_deref(),
                            Some("invalid_credentials" | "invalid_grant")
                        ) =>
                    {
                        ErrorCode::InvalidCredentials
                    }
                    401 => ErrorCode::NotAuthenticated,
                    403 => ErrorCode::PermissionDenied,
                    404 => ErrorCode::NotFound,
                    409 => ErrorCode::AlreadyExists,
                    _ => ErrorCode::BackendError,
                };
                let mut app = AppError::with_message(error_code, message)
                    .with_detail("remote_status", status);
                if let Some(code) = code {
                    app = app.with_detail("remote_code", code);
                }
                app
            }
            ClientError::Http(e) if e.is_timeout() => {
                AppError::with_message(ErrorCode::TimeoutError, e.to_string())
            }
            ClientError::Http(e) => AppError::with_message(ErrorCode::NetworkError, e.to_string()),
            ClientError::InvalidResponse(msg) => AppError::backend(msg),
            ClientError::Serialization(e) => AppError::internal(e.to_string()),
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
