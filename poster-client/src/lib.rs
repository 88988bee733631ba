//! Poster Client - backend client for the poster order service
//!
//! Talks to the hosted backend (PostgREST tables, the status lookup
//! procedure, GoTrue auth) and exposes the two view-models the HTTP service
//! is built on: [`OrderFormSession`] for the public form and
//! [`AdminConsole`] for the admin console.

pub mod auth;
pub mod backend;
pub mod config;
pub mod error;
#[cfg(feature = "memory")]
pub mod memory;
pub mod query;
pub mod repository;
pub mod rest;
pub mod schema;
pub mod session;

pub use auth::{AuthSession, AuthUser};
pub use backend::Backend;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
#[cfg(feature = "memory")]
pub use memory::MemoryBackend;
pub use query::Query;
pub use rest::RestBackend;
pub use schema::SchemaCapabilities;
pub use session::{AdminConsole, OrderFormSession};
