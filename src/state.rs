//! Application state shared across all request handlers.
//!
//! Requests are handled statelessly; the state holds only the validated
//! configuration and the authenticated store client. There is no in-process
//! response cache — CDN caching via Cache-Control headers covers the bot
//! branch, and redirects must never be cached.

use std::sync::Arc;

use crate::config::Config;
use crate::query::StoreClient;

/// Shared application state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Authenticated content store client.
    pub store: StoreClient,

    /// Application configuration.
    pub config: Arc<Config>,
}

impl AppState {
    /// Create application state from validated configuration.
    ///
    /// Fails when the configured credentials cannot form valid HTTP headers;
    /// this runs once at startup, before the listener binds.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let store = StoreClient::new(&config)?;

        tracing::info!(
            store_url = %config.store_url,
            "application state initialized"
        );

        Ok(Self {
            store,
            config: Arc::new(config),
        })
    }
}
