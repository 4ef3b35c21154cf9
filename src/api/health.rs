//! Health check endpoints for Kubernetes probes

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::api::types::Json;
use serde::Serialize;

use super::state::AppState;

/// Detailed health response with component status
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// Health check status
#[derive(Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Individual component health check
#[derive(Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// Simple health check - returns 200 if the service is running
/// Used for basic liveness probes
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
        latency_ms: None,
    };

    (StatusCode::OK, Json(response))
}

/// Readiness check with dependency verification
///
/// The record store is required; an unreachable cache only degrades the
/// service since reads fall back to the store.
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();
    let mut overall_status = HealthStatus::Healthy;

    let store_check = check_user_store(&state).await;

    if store_check.status != HealthStatus::Healthy {
        overall_status = HealthStatus::Unhealthy;
    }

    let cache_check = check_cache(&state).await;

    if cache_check.status != HealthStatus::Healthy && overall_status == HealthStatus::Healthy {
        overall_status = HealthStatus::Degraded;
    }

    let latency = start.elapsed().as_millis() as u64;
    let response = HealthResponse {
        status: overall_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(vec![store_check, cache_check]),
        latency_ms: Some(latency),
    };

    let status_code = match overall_status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Degraded => StatusCode::OK, // Still accept requests
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}

/// Liveness check - simple check to verify the service is running
/// Used for Kubernetes liveness probes to detect crashes
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

fn component_check<E: std::fmt::Display>(
    name: &str,
    result: Result<(), E>,
    start: Instant,
) -> HealthCheck {
    let (status, message) = match result {
        Ok(()) => (HealthStatus::Healthy, None),
        Err(e) => (HealthStatus::Unhealthy, Some(e.to_string())),
    };

    HealthCheck {
        name: name.to_string(),
        status,
        message,
        latency_ms: Some(start.elapsed().as_millis() as u64),
    }
}

async fn check_user_store(state: &AppState) -> HealthCheck {
    let start = Instant::now();
    let result = state.user_repository.ping().await;

    component_check("user_store", result, start)
}

async fn check_cache(state: &AppState) -> HealthCheck {
    let start = Instant::now();
    let result = state.cache.exists("health_probe").await.map(|_| ());

    component_check("cache", result, start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::MockCache;
    use crate::domain::user::MockUserRepository;
    use crate::infrastructure::cache::CacheConfig;
    use crate::infrastructure::services::{CacheStatsService, UserService};
    use crate::infrastructure::user::Argon2Hasher;
    use std::sync::Arc;
    use std::time::Duration;

    async fn ready_status(cache: MockCache, repository: Arc<MockUserRepository>) -> StatusCode {
        let cache: Arc<dyn crate::domain::cache::Cache> = Arc::new(cache);
        let repository: Arc<dyn crate::domain::user::UserRepository> = repository;
        let user_service = UserService::new(
            repository.clone(),
            cache.clone(),
            Arc::new(Argon2Hasher::new()),
            Duration::from_secs(900),
        );
        let stats = CacheStatsService::new(cache.clone(), CacheConfig::default());
        let state = AppState::new(Arc::new(user_service), Arc::new(stats), cache, repository);

        ready_check(State(state)).await.into_response().status()
    }

    #[tokio::test]
    async fn test_ready_when_all_components_up() {
        let status = ready_status(MockCache::new(), Arc::new(MockUserRepository::new())).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ready_does_not_read_user_rows() {
        let repository = Arc::new(MockUserRepository::new());
        for id in 1..=500 {
            repository
                .seed(id, crate::domain::user::NewUser {
                    email: format!("user{}@example.com", id),
                    first_name: "Seed".to_string(),
                    last_name: "User".to_string(),
                    phone_number: None,
                    user_type: Default::default(),
                    password_hash: "hash".to_string(),
                })
                .await;
        }

        for _ in 0..3 {
            let status = ready_status(MockCache::new(), repository.clone()).await;
            assert_eq!(status, StatusCode::OK);
        }

        assert_eq!(repository.list_calls(), 0);
        assert_eq!(repository.get_calls(), 0);
    }

    #[tokio::test]
    async fn test_ready_degraded_without_cache() {
        let status = ready_status(
            MockCache::new().with_error("Connection refused"),
            Arc::new(MockUserRepository::new()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_not_ready_without_store() {
        let repository = Arc::new(MockUserRepository::new());
        repository.set_should_fail(true).await;

        let status = ready_status(MockCache::new(), repository).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_health_status_serialization() {
        assert_eq!(
            serde_json::to_string(&HealthStatus::Healthy).unwrap(),
            "\"healthy\""
        );
        assert_eq!(
            serde_json::to_string(&HealthStatus::Degraded).unwrap(),
            "\"degraded\""
        );
        assert_eq!(
            serde_json::to_string(&HealthStatus::Unhealthy).unwrap(),
            "\"unhealthy\""
        );
    }

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: HealthStatus::Healthy,
            version: "1.0.0".to_string(),
            checks: None,
            latency_ms: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"healthy\""));
        assert!(json.contains("\"version\":\"1.0.0\""));
        assert!(!json.contains("checks"));
    }

    #[test]
    fn test_health_response_with_checks() {
        let response = HealthResponse {
            status: HealthStatus::Degraded,
            version: "1.0.0".to_string(),
            checks: Some(vec![
                HealthCheck {
                    name: "user_store".to_string(),
                    status: HealthStatus::Healthy,
                    message: None,
                    latency_ms: Some(5),
                },
                HealthCheck {
                    name: "cache".to_string(),
                    status: HealthStatus::Unhealthy,
                    message: Some("Connection refused".to_string()),
                    latency_ms: Some(100),
                },
            ]),
            latency_ms: Some(105),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"degraded\""));
        assert!(json.contains("\"user_store\""));
        assert!(json.contains("\"cache\""));
        assert!(json.contains("\"Connection refused\""));
    }
}
