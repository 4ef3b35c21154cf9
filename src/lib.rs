//! User cache API
//!
//! A user resource HTTP API with cache-aside read acceleration:
//! - List and retrieve are served from the cache when possible
//! - Create, update and delete invalidate the affected cache keys
//! - In-memory (moka) or Redis cache backends, in-memory or PostgreSQL stores
//! - Cache stats reporting for operators

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use api::state::AppState;
use config::StorageBackend;
use domain::cache::Cache;
use domain::user::UserRepository;
use infrastructure::cache::CacheFactory;
use infrastructure::services::{CacheStatsService, UserService};
use infrastructure::user::{Argon2Hasher, InMemoryUserRepository, PostgresUserRepository};

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let cache_config = config.cache.to_cache_config();

    info!(
        backend = %cache_config.cache_type,
        location = %cache_config.location,
        ttl_secs = cache_config.default_ttl.as_secs(),
        "Cache backend"
    );

    let cache: Arc<dyn Cache> = CacheFactory::new()
        .create(&cache_config)
        .await
        .context("Failed to create cache backend")?;

    let repository = create_user_repository(config).await?;

    let user_service = UserService::new(
        repository.clone(),
        cache.clone(),
        Arc::new(Argon2Hasher::new()),
        cache_config.default_ttl,
    );
    let cache_stats_service = CacheStatsService::new(cache.clone(), cache_config);

    Ok(AppState::new(
        Arc::new(user_service),
        Arc::new(cache_stats_service),
        cache,
        repository,
    ))
}

async fn create_user_repository(config: &AppConfig) -> anyhow::Result<Arc<dyn UserRepository>> {
    match config.storage.backend {
        StorageBackend::InMemory => {
            info!("Using in-memory user store");
            Ok(Arc::new(InMemoryUserRepository::new()))
        }
        StorageBackend::Postgres => {
            let database_url = config.storage.resolve_database_url().ok_or_else(|| {
                anyhow::anyhow!("DATABASE_URL is required for the postgres storage backend")
            })?;

            info!("Connecting to PostgreSQL...");
            let pool = sqlx::PgPool::connect(&database_url)
                .await
                .context("Failed to connect to PostgreSQL")?;
            info!("PostgreSQL connection established");

            let repository = PostgresUserRepository::new(pool);
            repository.ensure_schema().await?;

            Ok(Arc::new(repository))
        }
    }
}
