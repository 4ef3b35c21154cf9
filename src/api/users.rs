//! User resource endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::user::{UserId, UserResource};
use crate::domain::DomainError;
use crate::infrastructure::services::{CreateUserRequest, UpdateUserRequest};

fn parse_id(raw: &str) -> Result<UserId, ApiError> {
    raw.parse::<UserId>()
        .map_err(|e| ApiError::from(DomainError::invalid_id(e.to_string())))
}

/// GET /api/users/
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResource>>, ApiError> {
    debug!("Listing users");

    let users = state.user_service.list().await?;

    Ok(Json(users))
}

/// POST /api/users/
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResource>), ApiError> {
    let user = state.user_service.create(request).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/users/{id}/
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResource>, ApiError> {
    debug!(id = %id, "Retrieving user");

    let id = parse_id(&id)?;
    let user = state.user_service.retrieve(id).await?;

    Ok(Json(user))
}

/// PUT or PATCH /api/users/{id}/
///
/// Both methods apply a partial update; omitted fields keep their values.
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserResource>, ApiError> {
    let id = parse_id(&id)?;
    let user = state.user_service.update(id, request).await?;

    Ok(Json(user))
}

/// DELETE /api/users/{id}/
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.user_service.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
