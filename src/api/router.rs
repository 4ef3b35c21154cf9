use axum::{
    middleware,
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;

use super::cache_stats;
use super::health;
use super::middleware::metrics_middleware;
use super::state::AppState;
use super::users;

/// Create a minimal router without state
/// Note: /ready endpoint is not available without state
pub fn create_router() -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check))
        .layer(TraceLayer::new_for_http())
}

/// User resource routes, each served with and without a trailing slash
fn user_routes() -> Router<AppState> {
    let collection = get(users::list_users).post(users::create_user);
    let item = get(users::get_user)
        .put(users::update_user)
        .patch(users::update_user)
        .delete(users::delete_user);

    Router::new()
        .route("/api/users", collection.clone())
        .route("/api/users/", collection)
        .route("/api/users/cache-stats", get(cache_stats::cache_stats))
        .route("/api/users/cache-stats/", get(cache_stats::cache_stats))
        .route("/api/users/{id}", item.clone())
        .route("/api/users/{id}/", item)
}

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .merge(user_routes())
        .with_state(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::{Cache, MockCache};
    use crate::domain::user::{MockUserRepository, UserRepository};
    use crate::infrastructure::cache::CacheConfig;
    use crate::infrastructure::services::{CacheStatsService, UserService};
    use crate::infrastructure::user::Argon2Hasher;
    use axum::body::Body;
    use axum::http::{header::CONTENT_TYPE, Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    struct TestApp {
        router: Router,
        cache: Arc<MockCache>,
        repository: Arc<MockUserRepository>,
    }

    fn app_with(cache: MockCache) -> TestApp {
        let cache = Arc::new(cache);
        let repository = Arc::new(MockUserRepository::new());
        let dyn_cache: Arc<dyn Cache> = cache.clone();
        let dyn_repository: Arc<dyn UserRepository> = repository.clone();

        let user_service = UserService::new(
            dyn_repository.clone(),
            dyn_cache.clone(),
            Arc::new(Argon2Hasher::new()),
            Duration::from_secs(900),
        );
        let stats = CacheStatsService::new(
            dyn_cache.clone(),
            CacheConfig::redis("redis://127.0.0.1:6379/1"),
        );
        let state = AppState::new(
            Arc::new(user_service),
            Arc::new(stats),
            dyn_cache,
            dyn_repository,
        );

        TestApp {
            router: create_router_with_state(state),
            cache,
            repository,
        }
    }

    fn app() -> TestApp {
        app_with(MockCache::new())
    }

    async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, value)
    }

    fn new_user_body(email: &str) -> Value {
        json!({
            "email": email,
            "password": "testpass123",
            "first_name": "Test",
            "last_name": "User",
            "user_type": "passenger"
        })
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_router();
        let (status, body) = send(&app, "GET", "/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_create_then_list_with_and_without_slash() {
        let app = app();

        let (status, created) =
            send(&app.router, "POST", "/api/users/", Some(new_user_body("a@example.com"))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["email"], "a@example.com");
        assert!(created.get("password").is_none());
        assert!(created.get("password_hash").is_none());

        let (status, listed) = send(&app.router, "GET", "/api/users/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let (status, again) = send(&app.router, "GET", "/api/users", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(again, listed);
        assert_eq!(app.repository.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_retrieve_populates_item_cache() {
        let app = app();
        send(&app.router, "POST", "/api/users/", Some(new_user_body("a@example.com"))).await;

        let (status, user) = send(&app.router, "GET", "/api/users/1/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(user["id"], 1);
        assert!(app.cache.contains("user_1"));

        let (status, _) = send(&app.router, "GET", "/api/users/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(app.repository.get_calls(), 1);
    }

    #[tokio::test]
    async fn test_patch_and_put_update_and_invalidate() {
        let app = app();
        send(&app.router, "POST", "/api/users/", Some(new_user_body("a@example.com"))).await;
        send(&app.router, "GET", "/api/users/1/", None).await;

        let (status, user) = send(
            &app.router,
            "PATCH",
            "/api/users/1/",
            Some(json!({ "first_name": "Patched" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(user["first_name"], "Patched");
        assert!(!app.cache.contains("user_1"));

        let (status, user) = send(
            &app.router,
            "PUT",
            "/api/users/1",
            Some(json!({ "last_name": "Put", "user_type": "rider" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(user["last_name"], "Put");
        assert_eq!(user["user_type"], "rider");
        assert_eq!(user["first_name"], "Patched");
    }

    #[tokio::test]
    async fn test_delete_then_retrieve_is_not_found() {
        let app = app();
        send(&app.router, "POST", "/api/users/", Some(new_user_body("a@example.com"))).await;

        let (status, _) = send(&app.router, "DELETE", "/api/users/1/", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app.router, "GET", "/api/users/1/", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["type"], "not_found_error");

        let (status, _) = send(&app.router, "DELETE", "/api/users/1/", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_bad_request() {
        let app = app();

        let (status, body) = send(&app.router, "GET", "/api/users/abc/", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["param"], "id");
        assert_eq!(app.repository.get_calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_payload_is_bad_request() {
        let app = app();

        let (status, _) = send(
            &app.router,
            "POST",
            "/api/users/",
            Some(json!({ "email": "a@example.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) =
            send(&app.router, "POST", "/api/users/", Some(new_user_body("not-an-email"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "validation_error");
        assert_eq!(app.repository.create_calls(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_bad_request() {
        let app = app();
        send(&app.router, "POST", "/api/users/", Some(new_user_body("a@example.com"))).await;

        let (status, body) =
            send(&app.router, "POST", "/api/users/", Some(new_user_body("a@example.com"))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "conflict");
    }

    #[tokio::test]
    async fn test_cache_stats_lists_user_keys() {
        let app = app();
        send(&app.router, "POST", "/api/users/", Some(new_user_body("a@example.com"))).await;
        send(&app.router, "GET", "/api/users/", None).await;
        send(&app.router, "GET", "/api/users/1/", None).await;

        let (status, stats) = send(&app.router, "GET", "/api/users/cache-stats/", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["total_keys"], 2);
        assert_eq!(stats["user_cache_count"], 2);
        assert_eq!(stats["user_cache_keys"], json!(["user_1", "user_list"]));
        assert_eq!(stats["cache_backend"], "redis");
        assert_eq!(stats["cache_location"], "redis://127.0.0.1:6379/1");
        assert_eq!(stats["default_timeout"], 900);
    }

    #[tokio::test]
    async fn test_cache_stats_backend_failure() {
        let app = app_with(MockCache::new().with_keys_error("Connection refused"));

        let (status, body) = send(&app.router, "GET", "/api/users/cache-stats", None).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Could not retrieve cache stats");
        assert!(body["error"].as_str().unwrap().contains("Connection refused"));
    }

    #[tokio::test]
    async fn test_reads_survive_unreachable_cache() {
        let app = app_with(MockCache::new().with_error("Connection refused"));

        let (status, _) =
            send(&app.router, "POST", "/api/users/", Some(new_user_body("a@example.com"))).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, listed) = send(&app.router, "GET", "/api/users/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);
    }
}
