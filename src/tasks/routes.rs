use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use uuid::Uuid;

use super::{CompletionStatusQuery, CompletionUpdate, CreateTaskRequest, PriorityQuery, UpdateTaskRequest};
use crate::error::AppError;
use crate::routes::extract::{AppJson, AppPath, AppQuery};
use crate::routes::JwtUser;
use crate::state::AppState;

fn required(value: Option<String>, name: &str) -> Result<String, AppError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("{} is required", name)))
}

pub async fn create(
    State(state): State<AppState>,
    JwtUser(user): JwtUser,
    AppJson(payload): AppJson<CreateTaskRequest>,
) -> Result<impl IntoResponse, AppError> {
    let task = state.tasks.create(payload).await?;
    tracing::info!(%user, task_id = %task.id, list_id = %task.list_id, "task created");

    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update(
    State(state): State<AppState>,
    JwtUser(user): JwtUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateTaskRequest>,
) -> Result<impl IntoResponse, AppError> {
    let task = state.tasks.update(id, payload).await?;
    tracing::info!(%user, task_id = %id, "task updated");

    Ok(Json(task))
}

pub async fn delete(
    State(state): State<AppState>,
    JwtUser(user): JwtUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let response = state.tasks.delete(id).await?;
    tracing::info!(%user, task_id = %id, "task deleted");

    Ok(Json(response))
}

/// Tasks of a list with the given priority
pub async fn by_priority_and_list(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PriorityQuery>,
) -> Result<impl IntoResponse, AppError> {
    let list_id = required(query.list_id, "listId")?;
    let priority = query.priority.unwrap_or_default();

    let tasks = state
        .tasks
        .find_by_priority_and_list_id(&priority, &list_id)
        .await?;
    Ok(Json(tasks))
}

pub async fn get(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let task = state.tasks.find_by_id(id).await?;
    Ok(Json(task))
}

pub async fn by_list(
    State(state): State<AppState>,
    AppPath(list_id): AppPath<String>,
) -> Result<impl IntoResponse, AppError> {
    let tasks = state.tasks.find_all_by_list_id(&list_id).await?;
    Ok(Json(tasks))
}

pub async fn set_completed(
    State(state): State<AppState>,
    JwtUser(user): JwtUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(body): AppJson<CompletionUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let task = state.tasks.update_is_completed(id, body.is_completed).await?;
    tracing::info!(%user, task_id = %id, is_complete = task.is_complete, "task completion changed");

    Ok(Json(task))
}

/// Tasks of a list filtered by completion flag
pub async fn by_completion_status(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<CompletionStatusQuery>,
) -> Result<impl IntoResponse, AppError> {
    let list_id = required(query.list_id, "listId")?;
    let is_completed = query
        .is_completed
        .ok_or_else(|| AppError::BadRequest("isCompleted is required".to_string()))?;

    let tasks = state
        .tasks
        .find_by_completion_status(&list_id, is_completed)
        .await?;
    Ok(Json(tasks))
}
