//! Application state for shared services

use std::sync::Arc;

use crate::domain::cache::Cache;
use crate::domain::user::UserRepository;
use crate::infrastructure::services::{CacheStatsService, UserService};

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub cache_stats_service: Arc<CacheStatsService>,
    /// Cache backend, probed by the readiness check
    pub cache: Arc<dyn Cache>,
    /// Record store, probed by the readiness check
    pub user_repository: Arc<dyn UserRepository>,
}

impl AppState {
    pub fn new(
        user_service: Arc<UserService>,
        cache_stats_service: Arc<CacheStatsService>,
        cache: Arc<dyn Cache>,
        user_repository: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            user_service,
            cache_stats_service,
            cache,
            user_repository,
        }
    }
}
