use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use super::{CreateTaskRequest, DeleteResponse, Priority, Task, TaskChanges, TaskFilter, UpdateTaskRequest};
use crate::error::AppError;
use crate::store::TaskStore;

#[derive(Clone)]
pub struct TasksService {
    store: Arc<dyn TaskStore>,
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Task with id {} not found", id))
}

impl TasksService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, payload: CreateTaskRequest) -> Result<Task, AppError> {
        let task = payload.into_task(Utc::now())?;
        self.store.insert_task(&task).await?;

        Ok(task)
    }

    pub async fn update(&self, id: Uuid, payload: UpdateTaskRequest) -> Result<Task, AppError> {
        payload.validate()?;

        let changes = TaskChanges::new(payload, Utc::now());
        self.store
            .update_task(id, changes)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn delete(&self, id: Uuid) -> Result<DeleteResponse, AppError> {
        self.store.delete_task(id).await?.ok_or_else(|| not_found(id))?;

        Ok(DeleteResponse {
            message: format!("Task with id {} successfully deleted", id),
        })
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Task, AppError> {
        self.store.task_by_id(id).await?.ok_or_else(|| not_found(id))
    }

    pub async fn find_all_by_list_id(&self, list_id: &str) -> Result<Vec<Task>, AppError> {
        Ok(self.store.find_tasks(&TaskFilter::list(list_id)).await?)
    }

    pub async fn update_is_completed(&self, id: Uuid, is_completed: bool) -> Result<Task, AppError> {
        let changes = TaskChanges {
            is_complete: Some(is_completed),
            ..TaskChanges::touch(Utc::now())
        };
        self.store
            .update_task(id, changes)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn find_by_priority_and_list_id(
        &self,
        priority: &str,
        list_id: &str,
    ) -> Result<Vec<Task>, AppError> {
        let priority = priority
            .parse::<Priority>()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let filter = TaskFilter::list(list_id).with_priority(priority);
        Ok(self.store.find_tasks(&filter).await?)
    }

    pub async fn find_by_completion_status(
        &self,
        list_id: &str,
        is_completed: bool,
    ) -> Result<Vec<Task>, AppError> {
        let filter = TaskFilter::list(list_id).with_completion(is_completed);
        Ok(self.store.find_tasks(&filter).await?)
    }
}
