//! Poster server configuration

use poster_client::ClientConfig;
use shared::util::DEFAULT_DISPLAY_OFFSET_MINUTES;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Poster server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend project URL (PostgREST under `/rest/v1`, auth under `/auth/v1`)
    pub baas_url: String,
    /// Public (anon) API key of the backend project
    pub baas_anon_key: String,
    /// HTTP port
    pub http_port: u16,
    /// Timeout applied to backend calls and to each incoming request
    pub request_timeout_secs: u64,
    /// Minutes east of UTC used for form datetimes, CSV and slugs
    pub display_utc_offset_minutes: i32,
    /// Environment: development | staging | production
    pub environment: String,
    /// Allowed browser origin; every origin is allowed when unset
    pub cors_allow_origin: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, BoxError> {
        let value = |name: &str| var(name).filter(|v| !v.trim().is_empty());
        let required = |name: &str| -> Result<String, BoxError> {
            value(name).ok_or_else(|| format!("{name} must be set").into())
        };

        Ok(Self {
            baas_url: required("BAAS_URL")?,
            baas_anon_key: required("BAAS_ANON_KEY")?,
            http_port: parsed(value("HTTP_PORT")).unwrap_or(8080),
            request_timeout_secs: parsed(value("REQUEST_TIMEOUT_SECS")).unwrap_or(30),
            display_utc_offset_minutes: parsed(value("DISPLAY_UTC_OFFSET_MINUTES"))
                .unwrap_or(DEFAULT_DISPLAY_OFFSET_MINUTES),
            environment: value("ENVIRONMENT").unwrap_or_else(|| "development".into()),
            cors_allow_origin: value("CORS_ALLOW_ORIGIN"),
        })
    }

    /// Client settings for the anon-key backend handle
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(&self.baas_url, &self.baas_anon_key)
            .with_timeout(self.request_timeout_secs)
    }
}

fn parsed<T: std::str::FromStr>(raw: Option<String>) -> Option<T> {
    raw.and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, BoxError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[
            ("BAAS_URL", "https://demo.example.co"),
            ("BAAS_ANON_KEY", "anon"),
            ("CORS_ALLOW_ORIGIN", "  "),
        ])
        .unwrap();
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.display_utc_offset_minutes, 480);
        assert_eq!(config.environment, "development");
        assert!(config.cors_allow_origin.is_none());

        let client = config.client_config();
        assert_eq!(client.base_url, "https://demo.example.co");
        assert_eq!(client.timeout, 30);
        assert!(client.token.is_none());
    }

    #[test]
    fn test_overrides_and_bad_numbers() {
        let config = load(&[
            ("BAAS_URL", "https://demo.example.co"),
            ("BAAS_ANON_KEY", "anon"),
            ("HTTP_PORT", "9090"),
            ("REQUEST_TIMEOUT_SECS", "soon"),
            ("DISPLAY_UTC_OFFSET_MINUTES", "-300"),
            ("CORS_ALLOW_ORIGIN", "https://shop.example.com"),
        ])
        .unwrap();
        assert_eq!(config.http_port, 9090);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.display_utc_offset_minutes, -300);
        assert_eq!(
            config.cors_allow_origin.as_deref(),
            Some("https://shop.example.com")
        );
    }

    #[test]
    fn test_missing_backend_settings() {
        let err = load(&[("BAAS_URL", "https://demo.example.co")]).unwrap_err();
        assert_eq!(err.to_string(), "BAAS_ANON_KEY must be set");
    }
}
