//! Backend abstraction
//!
//! [`Backend`] is the seam between the repositories and the hosted service.
//! Rows cross it as JSON values so the trait stays object safe;
//! [`decode_rows`] turns them into typed models.

use crate::auth::{AuthSession, AuthUser};
use crate::query::Query;
use crate::ClientResult;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Table, procedure and auth operations of the hosted backend
#[async_trait]
pub trait Backend: Send + Sync {
    /// Rows matching `query`
    async fn select(&self, table: &str, query: &Query) -> ClientResult<Vec<Value>>;

    /// Insert one row or an array of rows; inserted rows are returned when
    /// `returning` is set, otherwise the result is empty
    async fn insert(&self, table: &str, rows: Value, returning: bool) -> ClientResult<Vec<Value>>;

    /// Patch every row matching `query`'s filters
    async fn update(&self, table: &str, query: &Query, patch: Value) -> ClientResult<()>;

    /// Delete every row matching `query`'s filters
    async fn delete(&self, table: &str, query: &Query) -> ClientResult<()>;

    /// Insert or merge on the `on_conflict` column
    async fn upsert(&self, table: &str, row: Value, on_conflict: &str) -> ClientResult<()>;

    /// Call a remote procedure
    async fn rpc(&self, function: &str, args: Value) -> ClientResult<Value>;

    async fn sign_in_with_password(&self, email: &str, password: &str)
    -> ClientResult<AuthSession>;

    /// Send a one-time sign-in link
    async fn send_magic_link(&self, email: &str, redirect_to: Option<&str>) -> ClientResult<()>;

    async fn sign_out(&self, access_token: &str) -> ClientResult<()>;

    async fn get_user(&self, access_token: &str) -> ClientResult<AuthUser>;

    /// Same backend, acting as the user holding `access_token`
    fn with_access_token(&self, access_token: &str) -> Arc<dyn Backend>;
}

/// Decode backend rows into typed models
pub fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> ClientResult<Vec<T>> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(Into::into))
        .collect()
}

/// Serialize a payload for the backend
pub fn encode<T: serde::Serialize>(payload: &T) -> ClientResult<Value> {
    serde_json::to_value(payload).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: String,
    }

    #[test]
    fn test_decode_rows() {
        let rows: Vec<Row> = decode_rows(vec![json!({"id": "a"}), json!({"id": "b"})]).unwrap();
        assert_eq!(rows[1], Row { id: "b".into() });

        let err = decode_rows::<Row>(vec![json!({"slug": "x"})]).unwrap_err();
        assert!(matches!(err, crate::ClientError::Serialization(_)));
    }
}
