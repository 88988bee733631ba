//! Application state for poster-server

use chrono::FixedOffset;
use poster_client::{
    AdminConsole, Backend, ClientResult, OrderFormSession, SchemaCapabilities,
};
use shared::util::display_offset;
use std::sync::Arc;

use crate::config::Config;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
///
/// View-models are built per request from the shared backend handle and the
/// capabilities detected at startup.
#[derive(Clone)]
pub struct AppState {
    /// Anon-key backend handle; admin calls scope it to the caller's token
    pub backend: Arc<dyn Backend>,
    /// Optional schema parts present in the deployed database
    pub caps: SchemaCapabilities,
    /// Display offset for form datetimes, exports and slugs
    pub offset: FixedOffset,
}

impl AppState {
    /// Connect to the backend and detect its schema once
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let backend: Arc<dyn Backend> = Arc::new(config.client_config().build_backend()?);
        let caps = SchemaCapabilities::detect(backend.as_ref()).await?;
        Ok(Self::with_backend(
            backend,
            caps,
            display_offset(config.display_utc_offset_minutes),
        ))
    }

    pub fn with_backend(
        backend: Arc<dyn Backend>,
        caps: SchemaCapabilities,
        offset: FixedOffset,
    ) -> Self {
        Self {
            backend,
            caps,
            offset,
        }
    }

    /// Fresh public form state, loaded
    pub async fn order_form(&self) -> ClientResult<OrderFormSession> {
        let mut session = OrderFormSession::new(self.backend.clone(), self.caps, self.offset);
        session.load().await?;
        Ok(session)
    }

    /// Admin console for `access_token`, authorized and loaded
    pub async fn admin_console(&self, access_token: &str) -> ClientResult<AdminConsole> {
        let mut console =
            AdminConsole::open(self.backend.clone(), self.caps, self.offset, access_token).await?;
        console.load().await?;
        Ok(console)
    }
}
