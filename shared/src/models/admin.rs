//! Admin membership

use serde::{Deserialize, Serialize};

/// Row of the `admins` table; membership is keyed by email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminRow {
    pub email: String,
}

/// Sign-in form input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// One-time sign-in link request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MagicLinkRequest {
    pub email: String,
    #[serde(default)]
    pub redirect_to: Option<String>,
}
