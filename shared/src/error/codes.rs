//! Error codes for the poster order service
//!
//! Codes are `u16` on the wire, grouped by range:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Campaign errors
//! - 4xxx: Order errors
//! - 5xxx: Field configuration errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    Success = 0,
    ValidationFailed = 2,
    NotFound = 3,
    AlreadyExists = 4,
    /// A required form field is empty
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    NotAuthenticated = 1001,
    /// Wrong email/password at sign-in
    InvalidCredentials = 1002,
    /// Missing or malformed Bearer token
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    PermissionDenied = 2001,
    /// Signed-in user is not listed in `admins`
    AdminRequired = 2003,

    // ==================== 3xxx: Campaign ====================
    CampaignNotFound = 3001,
    /// Lookup without a campaign slug
    CampaignNotSelected = 3002,
    CampaignTitleRequired = 3003,
    CampaignDescriptionTooLong = 3004,

    // ==================== 4xxx: Order ====================
    OrderNotFound = 4001,
    OrderInvalidQuantity = 4002,
    OrderInvalidTransferTime = 4003,
    OrderInvalidTransactionMethod = 4004,
    /// Status outside the campaign's resolved list
    OrderInvalidStatus = 4005,
    /// Status lookup without name or phone
    LookupCriteriaMissing = 4006,
    LookupPhoneTooShort = 4007,

    // ==================== 5xxx: Field configuration ====================
    CustomFieldsMalformed = 5001,
    CustomFieldInvalid = 5002,
    StatusOptionsEmpty = 5003,

    // ==================== 9xxx: System ====================
    InternalError = 9001,
    /// The hosted backend rejected the call; the message is the remote one
    BackendError = 9002,
    NetworkError = 9003,
    TimeoutError = 9004,
}

/// Every code, in declaration order
const ALL: [ErrorCode; 28] = [
    ErrorCode::Success,
    ErrorCode::ValidationFailed,
    ErrorCode::NotFound,
    ErrorCode::AlreadyExists,
    ErrorCode::RequiredField,
    ErrorCode::NotAuthenticated,
    ErrorCode::InvalidCredentials,
    ErrorCode::TokenInvalid,
    ErrorCode::PermissionDenied,
    ErrorCode::AdminRequired,
    ErrorCode::CampaignNotFound,
    ErrorCode::CampaignNotSelected,
    ErrorCode::CampaignTitleRequired,
    ErrorCode::CampaignDescriptionTooLong,
    ErrorCode::OrderNotFound,
    ErrorCode::OrderInvalidQuantity,
    ErrorCode::OrderInvalidTransferTime,
    ErrorCode::OrderInvalidTransactionMethod,
    ErrorCode::OrderInvalidStatus,
    ErrorCode::LookupCriteriaMissing,
    ErrorCode::LookupPhoneTooShort,
    ErrorCode::CustomFieldsMalformed,
    ErrorCode::CustomFieldInvalid,
    ErrorCode::StatusOptionsEmpty,
    ErrorCode::InternalError,
    ErrorCode::BackendError,
    ErrorCode::NetworkError,
    ErrorCode::TimeoutError,
];

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Developer-facing default message; user-facing text is set per error
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "OK",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenInvalid => "Token is invalid",
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Admin membership required",
            ErrorCode::CampaignNotFound => "Campaign not found",
            ErrorCode::CampaignNotSelected => "No campaign selected",
            ErrorCode::CampaignTitleRequired => "Campaign title is required",
            ErrorCode::CampaignDescriptionTooLong => "Campaign description is too long",
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderInvalidQuantity => "Quantity must be a positive whole number",
            ErrorCode::OrderInvalidTransferTime => "Transfer time is invalid",
            ErrorCode::OrderInvalidTransactionMethod => "Transaction method is invalid",
            ErrorCode::OrderInvalidStatus => "Order status is invalid",
            ErrorCode::LookupCriteriaMissing => "Name or phone is required",
            ErrorCode::LookupPhoneTooShort => "Phone fragment is too short",
            ErrorCode::CustomFieldsMalformed => "Custom field JSON is malformed",
            ErrorCode::CustomFieldInvalid => "Custom field definition is invalid",
            ErrorCode::StatusOptionsEmpty => "Status option list must not be empty",
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::BackendError => "Backend request failed",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// `u16` that names no [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid error code: {0}")]
pub struct InvalidErrorCode(pub u16);

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        ALL.into_iter()
            .find(|code| code.code() == value)
            .ok_or(InvalidErrorCode(value))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
