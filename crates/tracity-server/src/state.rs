//! Shared application state.

use std::sync::Arc;

use tracity_api::TracityApi;
use tracity_core::TracityConfig;
use tracity_insight::TextGenerator;
use tracity_store::DocumentStore;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: TracityConfig,
    pub api: TracityApi,
}

impl AppState {
    pub fn new(
        config: TracityConfig,
        store: Arc<dyn DocumentStore>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            config,
            api: TracityApi::new(store, generator),
        }
    }
}
