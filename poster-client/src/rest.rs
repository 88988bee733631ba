//! REST backend over `reqwest`
//!
//! Tables live under `/rest/v1/<table>`, procedures under `/rest/v1/rpc/<fn>`
//! and auth under `/auth/v1/*`. Every request carries the `apikey` header and
//! a bearer token (the user's access token, or the anon key).

use crate::auth::{AuthSession, AuthUser, OtpRequest, PasswordGrant};
use crate::backend::Backend;
use crate::query::Query;
use crate::{ClientConfig, ClientError, ClientResult};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

const PREFER: &str = "Prefer";

/// Error body shapes of PostgREST (`message`, `code`) and GoTrue
/// (`msg` / `error_description`, `error_code`)
#[derive(Debug, Default, Deserialize)]
struct RemoteError {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
    error_code: Option<String>,
    code: Option<Value>,
}

impl RemoteError {
    fn into_client_error(self, status: u16, fallback: String) -> ClientError {
        let code = self
            .error_code
            .or_else(|| match self.code {
                Some(Value::String(code)) => Some(code),
                _ => None,
            })
            .or(self.error.clone());
        let message = self
            .message
            .or(self.msg)
            .or(self.error_description)
            .or(self.error)
            .unwrap_or(fallback);
        ClientError::Api {
            status,
            code,
            message,
        }
    }
}

/// Hosted backend reached over HTTPS
#[derive(Debug, Clone)]
pub struct RestBackend {
    client: Client,
    base_url: String,
    anon_key: String,
    access_token: Option<String>,
}

impl RestBackend {
    /// Create a new backend from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            access_token: config.token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the current access token
    pub fn token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    fn request(&self, method: Method, url: &str, bearer: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.anon_key)
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {}", bearer))
    }

    fn rest(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/rest/v1/{}", self.base_url, path);
        let bearer = self.access_token.as_deref().unwrap_or(&self.anon_key);
        self.request(method, &url, bearer)
    }

    fn auth(&self, method: Method, path: &str, bearer: Option<&str>) -> RequestBuilder {
        let url = format!("{}/auth/v1/{}", self.base_url, path);
        self.request(method, &url, bearer.unwrap_or(&self.anon_key))
    }

    /// Map a non-success response to [`ClientError::Api`]
    async fn check(response: Response) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await?;
        let fallback = if text.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        } else {
            text.clone()
        };
        let remote: RemoteError = serde_json::from_str(&text).unwrap_or_default();
        let err = remote.into_client_error(status.as_u16(), fallback);
        tracing::debug!(status = status.as_u16(), error = %err, "Backend request rejected");
        Err(err)
    }

    /// Decode a JSON body; an empty body decodes as `null`
    async fn read_json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let text = response.text().await?;
        let body = if text.trim().is_empty() { "null" } else { &text };
        serde_json::from_str(body)
            .map_err(|e| ClientError::InvalidResponse(format!("{}: {}", e, text)))
    }

    async fn send(request: RequestBuilder) -> ClientResult<Response> {
        Self::check(request.send().await?).await
    }
}

#[async_trait]
impl Backend for RestBackend {
    async fn select(&self, table: &str, query: &Query) -> ClientResult<Vec<Value>> {
        tracing::debug!(table, params = ?query.to_params(), "select");
        let request = self.rest(Method::GET, table).query(&query.to_params());
        Self::read_json::<Option<Vec<Value>>>(Self::send(request).await?)
            .await
            .map(Option::unwrap_or_default)
    }

    async fn insert(&self, table: &str, rows: Value, returning: bool) -> ClientResult<Vec<Value>> {
        tracing::debug!(table, returning, "insert");
        let prefer = if returning {
            "return=representation"
        } else {
            "return=minimal"
        };
        let request = self
            .rest(Method::POST, table)
            .header(PREFER, prefer)
            .json(&rows);
        let response = Self::send(request).await?;
        if !returning {
            return Ok(Vec::new());
        }
        Self::read_json::<Option<Vec<Value>>>(response)
            .await
            .map(Option::unwrap_or_default)
    }

    async fn update(&self, table: &str, query: &Query, patch: Value) -> ClientResult<()> {
        tracing::debug!(table, params = ?query.to_params(), "update");
        let request = self
            .rest(Method::PATCH, table)
            .query(&query.to_params())
            .header(PREFER, "return=minimal")
            .json(&patch);
        Self::send(request).await?;
        Ok(())
    }

    async fn delete(&self, table: &str, query: &Query) -> ClientResult<()> {
        tracing::debug!(table, params = ?query.to_params(), "delete");
        let request = self.rest(Method::DELETE, table).query(&query.to_params());
        Self::send(request).await?;
        Ok(())
    }

    async fn upsert(&self, table: &str, row: Value, on_conflict: &str) -> ClientResult<()> {
        tracing::debug!(table, on_conflict, "upsert");
        let request = self
            .rest(Method::POST, table)
            .query(&[("on_conflict", on_conflict)])
            .header(PREFER, "resolution=merge-duplicates,return=minimal")
            .json(&row);
        Self::send(request).await?;
        Ok(())
    }

    async fn rpc(&self, function: &str, args: Value) -> ClientResult<Value> {
        tracing::debug!(function, "rpc");
        let request = self
            .rest(Method::POST, &format!("rpc/{}", function))
            .json(&args);
        Self::read_json(Self::send(request).await?).await
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> ClientResult<AuthSession> {
        let request = self
            .auth(Method::POST, "token", None)
            .query(&[("grant_type", "password")])
            .json(&PasswordGrant { email, password });
        Self::read_json(Self::send(request).await?).await
    }

    async fn send_magic_link(&self, email: &str, redirect_to: Option<&str>) -> ClientResult<()> {
        let mut request = self.auth(Method::POST, "otp", None).json(&OtpRequest {
            email,
            create_user: true,
        });
        if let Some(redirect_to) = redirect_to {
            request = request.query(&[("redirect_to", redirect_to)]);
        }
        Self::send(request).await?;
        Ok(())
    }

    async fn sign_out(&self, access_token: &str) -> ClientResult<()> {
        let request = self.auth(Method::POST, "logout", Some(access_token));
        Self::send(request).await?;
        Ok(())
    }

    async fn get_user(&self, access_token: &str) -> ClientResult<AuthUser> {
        let request = self.auth(Method::GET, "user", Some(access_token));
        match Self::send(request).await {
            Err(ClientError::Api { status: 401, .. }) => Err(ClientError::Unauthorized),
            Err(e) => Err(e),
            Ok(response) => Self::read_json(response).await,
        }
    }

    fn with_access_token(&self, access_token: &str) -> Arc<dyn Backend> {
        let mut backend = self.clone();
        backend.access_token = Some(access_token.to_string());
        Arc::new(backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_postgrest_shape() {
        let remote: RemoteError = serde_json::from_str(
            r#"{"code":"42703","details":null,"hint":null,"message":"column campaigns.notice does not exist"}"#,
        )
        .unwrap();
        let err = remote.into_client_error(400, String::new());
        assert!(err.is_missing_column());
        assert_eq!(err.to_string(), "column campaigns.notice does not exist");
    }

    #[test]
    fn test_remote_error_gotrue_shape() {
        let remote: RemoteError = serde_json::from_str(
            r#"{"code":400,"error_code":"invalid_credentials","msg":"Invalid login credentials"}"#,
        )
        .unwrap();
        match remote.into_client_error(400, String::new()) {
            ClientError::Api { code, message, .. } => {
                assert_eq!(code.as_deref(), Some("invalid_credentials"));
                assert_eq!(message, "Invalid login credentials");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_remote_error_fallback_text() {
        let err = RemoteError::default().into_client_error(502, "Bad Gateway".into());
        assert_eq!(err.to_string(), "Bad Gateway");
    }

    #[test]
    fn test_base_url_trimmed() {
        let backend = RestBackend::new(&ClientConfig::new("http://localhost:54321/", "anon")).unwrap();
        assert_eq!(backend.base_url(), "http://localhost:54321");
        assert!(backend.token().is_none());
    }
}
