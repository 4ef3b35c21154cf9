//! Cache introspection endpoint

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::types::Json;

/// Body returned when the cache backend cannot be enumerated
#[derive(Debug, Serialize)]
pub struct CacheStatsErrorResponse {
    pub error: String,
    pub message: String,
}

/// GET /api/users/cache-stats/
pub async fn cache_stats(State(state): State<AppState>) -> Response {
    match state.cache_stats_service.report().await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => {
            let body = CacheStatsErrorResponse {
                error: e.message().to_string(),
                message: "Could not retrieve cache stats".to_string(),
            };

            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}
