//! `admins` membership

use super::TABLE_ADMINS;
use crate::backend::{Backend, decode_rows};
use crate::query::Query;
use crate::ClientResult;
use shared::models::AdminRow;
use std::sync::Arc;

#[derive(Clone)]
pub struct AdminRepository {
    backend: Arc<dyn Backend>,
}

impl AdminRepository {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Whether `email` is listed in `admins`
    pub async fn is_admin(&self, email: &str) -> ClientResult<bool> {
        let query = Query::new().select("email").eq("email", email).limit(1);
        let rows: Vec<AdminRow> = decode_rows(self.backend.select(TABLE_ADMINS, &query).await?)?;
        Ok(!rows.is_empty())
    }
}
