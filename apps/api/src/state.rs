use std::sync::Arc;

use crate::auth::jwt::JwtConfig;
use crate::config::Config;
use crate::llm_client::LlmGateway;
use crate::storage::Store;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// `PgStore` in production, `MemoryStore` in tests.
    pub store: Arc<dyn Store>,
    pub llm: Arc<dyn LlmGateway>,
    pub jwt: JwtConfig,
    pub config: Config,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, llm: Arc<dyn LlmGateway>, config: Config) -> Self {
        Self {
            store,
            llm,
            jwt: JwtConfig::from(&config),
            config,
        }
    }
}
