//! Shared application state for all routes.

use crate::auth::{IdentityProvider, StubIdentityProvider};
use crate::config::AppConfig;
use crate::db::Database;
use crate::devtools::DevStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<AppConfig>,
    /// Decides who is calling; the guard checks scopes against its answer.
    pub identity: Arc<dyn IdentityProvider>,
    pub devtools: DevStore,
}

impl AppState {
    pub fn new(db: Database, config: AppConfig) -> Self {
        AppState {
            db,
            config: Arc::new(config),
            identity: Arc::new(StubIdentityProvider),
            devtools: DevStore::default(),
        }
    }

    pub fn with_identity(mut self, provider: impl IdentityProvider + 'static) -> Self {
        self.identity = Arc::new(provider);
        self
    }
}
