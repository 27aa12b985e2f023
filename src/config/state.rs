// Application state module
// Immutable per-process state shared by every connection

use super::types::Config;
use crate::routing::Router;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Route table built once at startup
    pub router: Router,
}

impl AppState {
    /// Create `AppState` with the function routes registered
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            router: Router::for_function(&config.function),
        }
    }
}
