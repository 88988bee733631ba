//! `orders` table and the status lookup procedure

use super::{RPC_SEARCH_ORDER_STATUS, TABLE_ORDERS};
use crate::backend::{Backend, decode_rows, encode};
use crate::query::Query;
use crate::schema::SchemaCapabilities;
use crate::ClientResult;
use serde_json::{Value, json};
use shared::models::{
    ORDER_COLUMNS, Order, OrderInsert, OrderStatusLookupRow, OrderUpdate, StatusLookupParams,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct OrderRepository {
    backend: Arc<dyn Backend>,
    caps: SchemaCapabilities,
}

impl OrderRepository {
    pub fn new(backend: Arc<dyn Backend>, caps: SchemaCapabilities) -> Self {
        Self { backend, caps }
    }

    /// Orders of one campaign, newest first
    pub async fn list_for_campaign(&self, campaign_id: &str) -> ClientResult<Vec<Order>> {
        let query = Query::new()
            .select(ORDER_COLUMNS)
            .eq("campaign_id", campaign_id)
            .order_desc("created_at");
        decode_rows(self.backend.select(TABLE_ORDERS, &query).await?)
    }

    pub async fn get(&self, id: &str) -> ClientResult<Option<Order>> {
        let query = Query::new().select(ORDER_COLUMNS).eq("id", id).limit(1);
        let rows: Vec<Order> = decode_rows(self.backend.select(TABLE_ORDERS, &query).await?)?;
        Ok(rows.into_iter().next())
    }

    pub async fn insert(&self, mut payload: OrderInsert) -> ClientResult<()> {
        if !self.caps.order_field_snapshot {
            payload.field_snapshot = None;
        }
        self.backend
            .insert(TABLE_ORDERS, encode(&payload)?, false)
            .await?;
        tracing::info!(campaign_id = %payload.campaign_id, "Order submitted");
        Ok(())
    }

    pub async fn update(&self, id: &str, payload: &OrderUpdate) -> ClientResult<()> {
        let query = Query::new().eq("id", id);
        self.backend
            .update(TABLE_ORDERS, &query, encode(payload)?)
            .await
    }

    /// Change only the status column
    pub async fn set_status(&self, id: &str, status: &str) -> ClientResult<()> {
        let query = Query::new().eq("id", id);
        self.backend
            .update(TABLE_ORDERS, &query, json!({ "status": status }))
            .await
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        let query = Query::new().eq("id", id);
        self.backend.delete(TABLE_ORDERS, &query).await?;
        tracing::info!(id, "Order deleted");
        Ok(())
    }

    /// Public status lookup through the remote procedure
    pub async fn lookup_status(
        &self,
        params: &StatusLookupParams,
    ) -> ClientResult<Vec<OrderStatusLookupRow>> {
        let rows = match self.backend.rpc(RPC_SEARCH_ORDER_STATUS, encode(params)?).await? {
            Value::Array(rows) => rows,
            Value::Null => Vec::new(),
            other => vec![other],
        };
        decode_rows(rows)
    }
}
