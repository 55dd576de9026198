//! Server state and configuration.

use crate::resolve::AssetResolver;
use crate::store::MemoryStore;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub store: MemoryStore,
    pub assets: AssetResolver,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            store: MemoryStore::new(),
            assets: AssetResolver::new(),
        }
    }
}
