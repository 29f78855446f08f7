use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use uuid::Uuid;

use super::{CreateListRequest, UpdateListRequest};
use crate::error::AppError;
use crate::routes::extract::{AppJson, AppPath};
use crate::routes::JwtUser;
use crate::state::AppState;

/// Create a new list
pub async fn create(
    State(state): State<AppState>,
    JwtUser(user): JwtUser,
    AppJson(payload): AppJson<CreateListRequest>,
) -> Result<impl IntoResponse, AppError> {
    let list = state.lists.create(payload).await?;
    tracing::info!(%user, list_id = %list.id, owner = %list.user_id, "list created");

    Ok((StatusCode::CREATED, Json(list)))
}

/// All lists owned by a user
pub async fn find_all(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<String>,
) -> Result<impl IntoResponse, AppError> {
    let lists = state.lists.find_all(&user_id).await?;
    Ok(Json(lists))
}

pub async fn find_one(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let list = state.lists.find_one(id).await?;
    Ok(Json(list))
}

pub async fn update(
    State(state): State<AppState>,
    JwtUser(user): JwtUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateListRequest>,
) -> Result<impl IntoResponse, AppError> {
    let list = state.lists.update(id, payload).await?;
    tracing::info!(%user, list_id = %id, "list updated");

    Ok(Json(list))
}

/// Delete a list, its tasks are not touched
pub async fn remove(
    State(state): State<AppState>,
    JwtUser(user): JwtUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let list = state.lists.remove(id).await?;
    tracing::info!(%user, list_id = %id, "list deleted");

    Ok(Json(list))
}
