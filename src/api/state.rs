//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::config::ApiConfig;
use crate::manager::SalonManager;
use crate::storage::Repository;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Business rules over the repository
    pub manager: Arc<SalonManager>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(repository: Arc<dyn Repository>, config: ApiConfig) -> Self {
        Self {
            manager: Arc::new(SalonManager::new(repository)),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
