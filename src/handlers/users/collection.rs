use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::database::models::{NewUser, User};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::UserService;

/// GET /api/users - list all users
pub async fn list(State(service): State<UserService>) -> ApiResult<Vec<User>> {
    let users = service.list().await?;
    Ok(ApiResponse::success(users))
}

/// POST /api/users - create a user, 201 on success
pub async fn create(
    State(service): State<UserService>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> ApiResult<User> {
    let Json(input) = payload?;
    let user = service.create(input).await?;
    Ok(ApiResponse::created(user))
}
