//! In-memory backend
//!
//! Implements [`Backend`] over plain JSON rows for tests (`memory` feature).
//! Tables and optional columns can be declared missing to reproduce older
//! deployments. `search_order_status` is implemented natively; row-level
//! security is not modelled.

use crate::auth::{AuthSession, AuthUser};
use crate::backend::Backend;
use crate::query::Query;
use crate::repository::{RPC_SEARCH_ORDER_STATUS, TABLE_ADMINS, TABLE_CAMPAIGNS, TABLE_ORDERS};
use crate::{ClientError, ClientResult};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use parking_lot::Mutex;
use serde_json::{Map, Value, json};
use shared::models::value_text;
use shared::util::digits_only;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

#[derive(Debug, Default)]
struct State {
    tables: HashMap<String, Vec<Value>>,
    missing_tables: HashSet<String>,
    missing_columns: HashSet<(String, String)>,
    /// email → (user id, password)
    users: HashMap<String, (String, String)>,
    /// access token → email
    tokens: HashMap<String, String>,
    magic_links: Vec<(String, Option<String>)>,
    seq: u64,
}

impl State {
    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn check_table(&self, table: &str) -> ClientResult<()> {
        if self.missing_tables.contains(table) {
            return Err(ClientError::Api {
                status: 404,
                code: Some("42P01".to_string()),
                message: format!("relation \"public.{}\" does not exist", table),
            });
        }
        Ok(())
    }

    fn check_columns<'a>(
        &self,
        table: &str,
        columns: impl IntoIterator<Item = &'a str>,
    ) -> ClientResult<()> {
        for column in columns {
            if self
                .missing_columns
                .contains(&(table.to_string(), column.to_string()))
            {
                return Err(ClientError::Api {
                    status: 400,
                    code: Some("42703".to_string()),
                    message: format!("column {}.{} does not exist", table, column),
                });
            }
        }
        Ok(())
    }

    fn rows_mut(&mut self, table: &str) -> &mut Vec<Value> {
        self.tables.entry(table.to_string()).or_default()
    }

    /// Fill `id` / `created_at` the way column defaults would
    fn with_defaults(&mut self, row: Value) -> Value {
        let Value::Object(mut map) = row else {
            return row;
        };
        let seq = self.next_seq();
        map.entry("id").or_insert_with(|| json!(format!("id-{}", seq)));
        let created = Utc::now() + Duration::milliseconds(seq as i64);
        map.entry("created_at")
            .or_insert_with(|| json!(created.to_rfc3339()));
        Value::Object(map)
    }
}

fn matches(row: &Value, query: &Query) -> bool {
    query.filters().iter().all(|filter| {
        row.get(&filter.column)
            .is_some_and(|value| value_text(value) == filter.value)
    })
}

fn compare(a: &Value, b: &Value, column: &str) -> Ordering {
    let left = a.get(column).map(value_text).unwrap_or_default();
    let right = b.get(column).map(value_text).unwrap_or_default();
    left.cmp(&right)
}

fn project(row: &Value, columns: Option<&str>) -> Value {
    let (Some(columns), Value::Object(map)) = (columns, row) else {
        return row.clone();
    };
    if columns == "*" {
        return row.clone();
    }
    let projected: Map<String, Value> = columns
        .split(',')
        .filter_map(|c| map.get(c).map(|v| (c.to_string(), v.clone())))
        .collect();
    Value::Object(projected)
}

fn payload_columns(value: &Value) -> Vec<&str> {
    match value {
        Value::Object(map) => map.keys().map(String::as_str).collect(),
        Value::Array(rows) => rows.iter().flat_map(payload_columns).collect(),
        _ => Vec::new(),
    }
}

fn merge_into(row: &mut Value, patch: &Value) {
    if let (Value::Object(target), Value::Object(source)) = (row, patch) {
        for (key, value) in source {
            target.insert(key.clone(), value.clone());
        }
    }
}

/// Backend over in-memory tables; clones share state
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<State>>,
    access_token: Option<String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user that can sign in with a password
    pub fn with_user(self, email: &str, password: &str) -> Self {
        {
            let mut state = self.state.lock();
            let id = format!("user-{}", state.next_seq());
            state
                .users
                .insert(email.to_string(), (id, password.to_string()));
        }
        self
    }

    /// Register a user and list them in `admins`
    pub fn with_admin(self, email: &str, password: &str) -> Self {
        self.with_user(email, password)
            .with_row(TABLE_ADMINS, json!({ "email": email }))
    }

    pub fn with_row(self, table: &str, row: Value) -> Self {
        {
            let mut state = self.state.lock();
            let row = state.with_defaults(row);
            state.rows_mut(table).push(row);
        }
        self
    }

    /// Make every request to `table` fail as an unknown relation
    pub fn without_table(self, table: &str) -> Self {
        self.state.lock().missing_tables.insert(table.to_string());
        self
    }

    /// Make every request naming `table.column` fail as an unknown column
    pub fn without_column(self, table: &str, column: &str) -> Self {
        self.state
            .lock()
            .missing_columns
            .insert((table.to_string(), column.to_string()));
        self
    }

    /// Snapshot of a table, insertion order
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.state
            .lock()
            .tables
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    /// Tokens that are currently signed in
    pub fn active_tokens(&self) -> Vec<String> {
        self.state.lock().tokens.keys().cloned().collect()
    }

    pub fn magic_links(&self) -> Vec<(String, Option<String>)> {
        self.state.lock().magic_links.clone()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    fn search_order_status(state: &State, args: &Value) -> Value {
        let text = |key: &str| {
            args.get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let Some(slug) = text("p_campaign_slug") else {
            return json!([]);
        };
        let name = text("p_query_name");
        let phone = text("p_query_phone").map(|p| digits_only(&p));

        let empty = Vec::new();
        let campaigns = state.tables.get(TABLE_CAMPAIGNS).unwrap_or(&empty);
        let Some(campaign) = campaigns
            .iter()
            .find(|c| c.get("slug").and_then(Value::as_str) == Some(slug.as_str()))
        else {
            return json!([]);
        };
        let campaign_id = campaign.get("id").map(value_text).unwrap_or_default();
        let title = campaign.get("title").cloned().unwrap_or(Value::Null);

        let rows: Vec<Value> = state
            .tables
            .get(TABLE_ORDERS)
            .unwrap_or(&empty)
            .iter()
            .filter(|o| o.get("campaign_id").map(value_text).as_deref() == Some(campaign_id.as_str()))
            .filter(|o| {
                name.as_ref().is_none_or(|n| {
                    o.get("customer_name").map(value_text).as_deref() == Some(n.as_str())
                })
            })
            .filter(|o| {
                phone.as_ref().is_none_or(|p| {
                    o.get("phone")
                        .map(|v| digits_only(&value_text(v)))
                        .is_some_and(|digits| digits.contains(p.as_str()))
                })
            })
            .map(|o| {
                json!({
                    "campaign_title": title,
                    "customer_name": o.get("customer_name"),
                    "quantity": o.get("quantity"),
                    "status": o.get("status"),
                    "submitted_at": o.get("created_at"),
                })
            })
            .collect();
        Value::Array(rows)
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn select(&self, table: &str, query: &Query) -> ClientResult<Vec<Value>> {
        let state = self.state.lock();
        state.check_table(table)?;
        if let Some(columns) = query.columns() {
            state.check_columns(table, columns.split(','))?;
        }

        let mut rows: Vec<Value> = state
            .tables
            .get(table)
            .map(|rows| rows.iter().filter(|r| matches(r, query)).cloned().collect())
            .unwrap_or_default();
        if let Some(order) = query.ordering() {
            rows.sort_by(|a, b| {
                let ord = compare(a, b, &order.column);
                if order.descending { ord.reverse() } else { ord }
            });
        }
        if let Some(limit) = query.max_rows() {
            rows.truncate(limit);
        }
        Ok(rows
            .iter()
            .map(|row| project(row, query.columns()))
            .collect())
    }

    async fn insert(&self, table: &str, rows: Value, returning: bool) -> ClientResult<Vec<Value>> {
        let mut state = self.state.lock();
        state.check_table(table)?;
        state.check_columns(table, payload_columns(&rows))?;

        let rows = match rows {
            Value::Array(rows) => rows,
            row => vec![row],
        };
        let mut inserted = Vec::with_capacity(rows.len());
        for row in rows {
            let row = state.with_defaults(row);
            state.rows_mut(table).push(row.clone());
            inserted.push(row);
        }
        Ok(if returning { inserted } else { Vec::new() })
    }

    async fn update(&self, table: &str, query: &Query, patch: Value) -> ClientResult<()> {
        let mut state = self.state.lock();
        state.check_table(table)?;
        state.check_columns(table, payload_columns(&patch))?;

        let now = json!(Utc::now().to_rfc3339());
        for row in state.rows_mut(table).iter_mut().filter(|r| matches(r, query)) {
            merge_into(row, &patch);
            if table == TABLE_ORDERS {
                merge_into(row, &json!({ "updated_at": now }));
            }
        }
        Ok(())
    }

    async fn delete(&self, table: &str, query: &Query) -> ClientResult<()> {
        let mut state = self.state.lock();
        state.check_table(table)?;
        state.rows_mut(table).retain(|r| !matches(r, query));
        Ok(())
    }

    async fn upsert(&self, table: &str, row: Value, on_conflict: &str) -> ClientResult<()> {
        let mut state = self.state.lock();
        state.check_table(table)?;
        state.check_columns(table, payload_columns(&row))?;

        let key = row.get(on_conflict).cloned();
        let existing = state
            .rows_mut(table)
            .iter_mut()
            .find(|r| key.is_some() && r.get(on_conflict) == key.as_ref());
        match existing {
            Some(target) => merge_into(target, &row),
            None => {
                let row = state.with_defaults(row);
                state.rows_mut(table).push(row);
            }
        }
        Ok(())
    }

    async fn rpc(&self, function: &str, args: Value) -> ClientResult<Value> {
        let state = self.state.lock();
        if function == RPC_SEARCH_ORDER_STATUS {
            return Ok(Self::search_order_status(&state, &args));
        }
        Err(ClientError::Api {
            status: 404,
            code: Some("PGRST202".to_string()),
            message: format!("Could not find the function public.{}", function),
        })
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> ClientResult<AuthSession> {
        let mut state = self.state.lock();
        let user_id = match state.users.get(email) {
            Some((id, expected)) if expected == password => id.clone(),
            _ => {
                return Err(ClientError::Api {
                    status: 400,
                    code: Some("invalid_credentials".to_string()),
                    message: "Invalid login credentials".to_string(),
                });
            }
        };
        let token = format!("token-{}", state.next_seq());
        state.tokens.insert(token.clone(), email.to_string());
        Ok(AuthSession {
            access_token: token,
            refresh_token: None,
            token_type: "bearer".to_string(),
            expires_in: Some(3600),
            user: AuthUser {
                id: user_id,
                email: Some(email.to_string()),
            },
        })
    }

    async fn send_magic_link(&self, email: &str, redirect_to: Option<&str>) -> ClientResult<()> {
        self.state
            .lock()
            .magic_links
            .push((email.to_string(), redirect_to.map(str::to_string)));
        Ok(())
    }

    async fn sign_out(&self, access_token: &str) -> ClientResult<()> {
        self.state.lock().tokens.remove(access_token);
        Ok(())
    }

    async fn get_user(&self, access_token: &str) -> ClientResult<AuthUser> {
        let state = self.state.lock();
        let email = state
            .tokens
            .get(access_token)
            .ok_or(ClientError::Unauthorized)?;
        let id = state
            .users
            .get(email)
            .map(|(id, _)| id.clone())
            .unwrap_or_default();
        Ok(AuthUser {
            id,
            email: Some(email.clone()),
        })
    }

    fn with_access_token(&self, access_token: &str) -> Arc<dyn Backend> {
        Arc::new(Self {
            state: self.state.clone(),
            access_token: Some(access_token.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_select_filters_orders_and_projects() {
        let backend = MemoryBackend::new()
            .with_row("t", json!({"id": "a", "group": "x", "rank": 2}))
            .with_row("t", json!({"id": "b", "group": "x", "rank": 1}))
            .with_row("t", json!({"id": "c", "group": "y", "rank": 3}));

        let query = Query::new()
            .select("id")
            .eq("group", "x")
            .order_asc("rank");
        let rows = backend.select("t", &query).await.unwrap();
        assert_eq!(rows, vec![json!({"id": "b"}), json!({"id": "a"})]);
    }

    #[tokio::test]
    async fn test_missing_schema_parts() {
        let backend = MemoryBackend::new()
            .without_table("logs")
            .without_column("orders", "field_snapshot");

        let err = backend.select("logs", &Query::new()).await.unwrap_err();
        assert!(err.is_missing_relation());

        let err = backend
            .insert("orders", json!({"field_snapshot": []}), false)
            .await
            .unwrap_err();
        assert!(err.is_missing_column());
    }

    #[tokio::test]
    async fn test_upsert_merges_on_conflict() {
        let backend = MemoryBackend::new();
        backend
            .upsert("s", json!({"key": "k", "value": 1}), "key")
            .await
            .unwrap();
        backend
            .upsert("s", json!({"key": "k", "value": 2}), "key")
            .await
            .unwrap();
        let rows = backend.rows("s");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["value"], 2);
    }

    #[tokio::test]
    async fn test_password_sign_in() {
        let backend = MemoryBackend::new().with_user("a@example.com", "pw");
        assert!(backend.sign_in_with_password("a@example.com", "bad").await.is_err());

        let session = backend
            .sign_in_with_password("a@example.com", "pw")
            .await
            .unwrap();
        let user = backend.get_user(&session.access_token).await.unwrap();
        assert_eq!(user.email.as_deref(), Some("a@example.com"));

        backend.sign_out(&session.access_token).await.unwrap();
        assert!(matches!(
            backend.get_user(&session.access_token).await,
            Err(ClientError::Unauthorized)
        ));
    }
}
