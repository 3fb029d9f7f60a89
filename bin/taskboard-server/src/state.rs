//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::config::Config;
use crate::store::EntityStore;

/// State shared across all HTTP handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Task and project collections.
    pub store: Arc<EntityStore>,
}

impl AppState {
    /// Build the state for `config`, seeding the store when configured to.
    pub async fn new(config: Config) -> Self {
        let store = if config.seed_data {
            EntityStore::seeded().await
        } else {
            EntityStore::new()
        };
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
        }
    }
}
