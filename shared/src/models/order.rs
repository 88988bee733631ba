//! Order Model

use super::field::FieldDescriptor;
use crate::util::{lenient_datetime, null_as_default};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Fixed transaction methods, in display order
pub const TRANSACTION_METHODS: [&str; 2] = ["面交", "賣貨便"];

/// Column list used when loading orders for the admin console
pub const ORDER_COLUMNS: &str = "id, campaign_id, customer_name, phone, email, quantity, \
     transfer_account, transfer_time, transaction_method, note, status, extra_data, \
     created_at, updated_at";

/// Order row as read from the `orders` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub campaign_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub customer_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantity: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub transfer_account: String,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub transfer_time: Option<DateTime<Utc>>,
    #[serde(default = "default_transaction_method", deserialize_with = "transaction_method")]
    pub transaction_method: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub note: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "object_or_empty")]
    pub extra_data: Map<String, Value>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Custom value as display text; missing or null renders empty
    pub fn extra_text(&self, key: &str) -> String {
        self.extra_data.get(key).map(value_text).unwrap_or_default()
    }
}

/// Render a JSON scalar the way a form input would show it
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn default_transaction_method() -> String {
    TRANSACTION_METHODS[0].to_string()
}

fn transaction_method<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(default_transaction_method))
}

fn object_or_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => map,
        _ => Map::new(),
    })
}

/// Insert payload for `orders`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderInsert {
    pub campaign_id: String,
    pub customer_name: String,
    pub phone: String,
    pub email: String,
    pub quantity: i64,
    pub transfer_account: String,
    pub transfer_time: DateTime<Utc>,
    pub transaction_method: String,
    pub note: String,
    pub status: String,
    pub extra_data: Map<String, Value>,
    /// Omitted when the remote schema has no `field_snapshot` column
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_snapshot: Option<Vec<FieldDescriptor>>,
}

/// Admin edit of an existing order, as submitted by the console
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderEdit {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    /// Raw input text, validated as a positive whole number
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub transfer_account: String,
    #[serde(default)]
    pub transfer_time: String,
    #[serde(default)]
    pub transaction_method: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub status: String,
    /// Custom field key → edited value
    #[serde(default)]
    pub custom_values: HashMap<String, String>,
}

/// Validated update payload for `orders`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderUpdate {
    pub customer_name: String,
    pub phone: String,
    pub email: String,
    pub quantity: i64,
    pub transfer_account: String,
    pub transfer_time: DateTime<Utc>,
    pub transaction_method: String,
    pub note: String,
    pub status: String,
    pub extra_data: Map<String, Value>,
}

/// Row returned by the `search_order_status` procedure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderStatusLookupRow {
    #[serde(default, deserialize_with = "null_as_default")]
    pub campaign_title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub customer_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantity: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Arguments of the `search_order_status` procedure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusLookupParams {
    pub p_campaign_slug: String,
    pub p_query_name: Option<String>,
    pub p_query_phone: Option<String>,
}

/// Public lookup form input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusLookupQuery {
    #[serde(default)]
    pub campaign_slug: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
}

/// Row of `order_status_logs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderStatusLog {
    #[serde(default, deserialize_with = "null_as_default")]
    pub order_id: String,
    #[serde(default)]
    pub old_status: Option<String>,
    #[serde(default)]
    pub new_status: Option<String>,
    #[serde(default)]
    pub changed_by: Option<String>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub changed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_reads_sparse_row() {
        let json = r#"{
            "id": "o1",
            "campaign_id": "c1",
            "customer_name": "王小明",
            "phone": "0912345678",
            "email": "a@example.com",
            "quantity": 2,
            "transfer_account": "12345",
            "transfer_time": "2024-05-01T02:00:00+00:00",
            "transaction_method": null,
            "note": null,
            "status": "已匯款",
            "extra_data": "not-an-object",
            "created_at": "2024-05-01T02:00:00+00:00",
            "updated_at": null
        }"#;

        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.transaction_method, "面交");
        assert_eq!(order.note, "");
        assert!(order.extra_data.is_empty());
        assert!(order.updated_at.is_none());
        assert_eq!(order.quantity, 2);
    }

    #[test]
    fn test_extra_text() {
        let order: Order = serde_json::from_str(
            r#"{"id":"o","extra_data":{"size":"A1","count":3,"gone":null}}"#,
        )
        .unwrap();
        assert_eq!(order.extra_text("size"), "A1");
        assert_eq!(order.extra_text("count"), "3");
        assert_eq!(order.extra_text("gone"), "");
        assert_eq!(order.extra_text("missing"), "");
    }

    #[test]
    fn test_lookup_params_serialize_nulls() {
        let params = StatusLookupParams {
            p_campaign_slug: "s".into(),
            p_query_name: None,
            p_query_phone: Some("912".into()),
        };
        let json = serde_json::to_value(&params).unwrap();
        assert!(json["p_query_name"].is_null());
        assert_eq!(json["p_query_phone"], "912");
    }

    #[test]
    fn test_insert_omits_snapshot_when_absent() {
        let insert = OrderInsert {
            campaign_id: "c".into(),
            customer_name: "n".into(),
            phone: "p".into(),
            email: "e".into(),
            quantity: 1,
            transfer_account: "a".into(),
            transfer_time: Utc::now(),
            transaction_method: "面交".into(),
            note: String::new(),
            status: "已匯款".into(),
            extra_data: Map::new(),
            field_snapshot: None,
        };
        let json = serde_json::to_value(&insert).unwrap();
        assert!(json.get("field_snapshot").is_none());
    }
}
