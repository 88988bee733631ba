//! Client configuration

/// Connection settings for the hosted backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Project base URL (e.g., "https://xyz.example.co")
    pub base_url: String,

    /// Public anonymous key, sent as `apikey` on every request
    pub anon_key: String,

    /// Signed-in user's access token; the anon key is used when absent
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    /// Create a new configuration
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            anon_key: anon_key.into(),
            token: None,
            timeout: 30,
        }
    }

    /// Set the access token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Create a REST backend from this configuration
    pub fn build_backend(&self) -> crate::ClientResult<crate::RestBackend> {
        crate::RestBackend::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = ClientConfig::new("http://localhost:54321", "anon")
            .with_token("jwt")
            .with_timeout(5);
        assert_eq!(config.anon_key, "anon");
        assert_eq!(config.token.as_deref(), Some("jwt"));
        assert_eq!(config.timeout, 5);
    }
}
