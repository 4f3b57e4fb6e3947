// Application state module
// Runtime state shared across requests

use std::sync::atomic::AtomicBool;

use super::types::Config;

/// Application state
pub struct AppState {
    pub config: Config,

    // Cached config value for fast access without locks
    pub cached_access_log: AtomicBool,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            cached_access_log: AtomicBool::new(config.logging.access_log),
            config: config.clone(),
        }
    }
}
