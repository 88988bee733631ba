//! Error codes, the shared [`AppError`] and its JSON body
//!
//! ```
//! use shared::error::{AppError, ErrorBody, ErrorCode};
//!
//! let err = AppError::with_message(ErrorCode::OrderInvalidQuantity, "請輸入正確數量")
//!     .with_detail("field", "quantity");
//! assert_eq!(err.field(), Some("quantity"));
//!
//! let body = ErrorBody::from(&err);
//! assert_eq!(body.code, 4002);
//! ```

mod codes;
mod http;
mod types;

pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult, ErrorBody};
