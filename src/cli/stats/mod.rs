//! Cache stats command - prints the stats report for the configured backend

use anyhow::Context;

use crate::config::AppConfig;
use crate::infrastructure::cache::{CacheConfig, CacheFactory, CacheType};
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::services::CacheStatsService;

/// Print the cache stats report as pretty JSON
///
/// Fails (non-zero exit) when the configuration is invalid or the backend
/// cannot be reached or enumerated.
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_logging(&config.logging);

    let cache_config = shared_cache_config(&config)?;
    let cache = CacheFactory::new()
        .create(&cache_config)
        .await
        .context("Failed to connect to cache backend")?;

    let stats = CacheStatsService::new(cache, cache_config)
        .report()
        .await
        .context("Could not retrieve cache stats")?;

    println!("{}", serde_json::to_string_pretty(&stats)?);

    Ok(())
}

/// Cache configuration for a backend this process can share with the server
///
/// An in-memory cache lives inside the server process, so a fresh one here
/// would always report zero keys.
fn shared_cache_config(config: &AppConfig) -> anyhow::Result<CacheConfig> {
    let cache_config = config.cache.to_cache_config();

    if cache_config.cache_type == CacheType::InMemory {
        anyhow::bail!(
            "cache-stats needs a shared cache backend; the in_memory cache is only \
             visible inside the running server (use GET /api/users/cache-stats/)"
        );
    }

    Ok(cache_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheBackend;

    #[test]
    fn test_in_memory_backend_is_rejected() {
        let config = AppConfig::default();

        let error = shared_cache_config(&config).unwrap_err();
        assert!(error.to_string().contains("in_memory"));
    }

    #[test]
    fn test_redis_backend_is_accepted() {
        let mut config = AppConfig::default();
        config.cache.backend = CacheBackend::Redis;

        let cache_config = shared_cache_config(&config).unwrap();
        assert_eq!(cache_config.cache_type, CacheType::Redis);
        assert_eq!(cache_config.location, "redis://127.0.0.1:6379/1");
    }
}
