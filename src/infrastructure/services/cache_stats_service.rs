//! Cache stats service
//!
//! Enumerates the whole backend keyspace and picks out the keys that belong
//! to the user resource. Enumeration is a full scan, so this is meant for
//! operators and diagnostics rather than hot paths.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::cache::{Cache, CacheStats, CacheStatsError};
use crate::infrastructure::cache::CacheConfig;
use crate::infrastructure::observability::record_cache_error;

/// Substring marking a key as belonging to the user resource
pub const USER_KEY_MARKER: &str = "user";

/// Reports which user keys are currently cached
#[derive(Debug)]
pub struct CacheStatsService {
    cache: Arc<dyn Cache>,
    config: CacheConfig,
}

impl CacheStatsService {
    pub fn new(cache: Arc<dyn Cache>, config: CacheConfig) -> Self {
        Self { cache, config }
    }

    /// Build a stats report
    ///
    /// A backend that cannot be enumerated yields `CacheStatsError::Backend`,
    /// never a report with zero keys.
    pub async fn report(&self) -> Result<CacheStats, CacheStatsError> {
        let keys = self.cache.keys_matching("*").await.map_err(|e| {
            warn!(error = %e, "Failed to enumerate cache keys");
            record_cache_error("keys");
            CacheStatsError::backend(e.to_string())
        })?;

        let total_keys = keys.len();
        let user_cache_keys: Vec<String> = keys
            .into_iter()
            .filter(|key| key.contains(USER_KEY_MARKER))
            .collect();

        debug!(
            total_keys = total_keys,
            user_keys = user_cache_keys.len(),
            "Built cache stats report"
        );

        Ok(CacheStats {
            total_keys,
            user_cache_count: user_cache_keys.len(),
            user_cache_keys,
            cache_backend: self.config.backend_name(),
            cache_location: self.config.location.clone(),
            default_timeout: self.config.default_ttl.as_secs(),
        })
    }
}
