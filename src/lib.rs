//! Mindwell API client.
//!
//! HTTP client for the Mindwell journaling backend with a complete
//! authentication-token lifecycle: secure persistence of the access/refresh
//! pair, proactive renewal before expiry, single-flight coordination of
//! concurrent refreshes, and a one-shot retry after an unexpected 401/403.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use mindwell_api::prelude::*;
//!
//! # async fn example() -> mindwell_api::error::Result<()> {
//! let store = Arc::new(FileTokenStore::new_default());
//! let client = ApiClient::new(ClientConfig::new("https://api.example.com"), store)?;
//!
//! // After login, persist the pair; the client handles everything else.
//! client.set_tokens(
//!     &TokenUpdate::new()
//!         .access_token(Some("jwt-access"))
//!         .refresh_token(Some("opaque-refresh")),
//! )?;
//!
//! let entries = client.get("/mood-entries").await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod prelude;
