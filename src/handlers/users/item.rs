use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use uuid::Uuid;

use crate::database::models::{User, UserPatch};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::UserService;

// Ids that are not UUIDs are rejected as 400 before reaching the service

/// GET /api/users/:id - show a single user
pub async fn show(
    State(service): State<UserService>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<User> {
    let Path(id) = id?;
    let user = service.find(id).await?;
    Ok(ApiResponse::success(user))
}

/// PATCH /api/users/:id - update the fields present in the body
pub async fn update(
    State(service): State<UserService>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UserPatch>, JsonRejection>,
) -> ApiResult<User> {
    let Path(id) = id?;
    let Json(patch) = payload?;
    let user = service.update(id, patch).await?;
    Ok(ApiResponse::success(user))
}

/// DELETE /api/users/:id - remove a user, 204 on success
pub async fn destroy(
    State(service): State<UserService>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = id?;
    service.delete(id).await?;
    Ok(ApiResponse::<()>::no_content())
}
