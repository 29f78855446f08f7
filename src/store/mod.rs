mod memory;
mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::lists::{List, ListChanges};
use crate::tasks::{Task, TaskChanges, TaskFilter};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint (list or task name) was violated.
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Persistence for the `lists` collection.
///
/// Update and delete return `Ok(None)` when no record has the given id.
#[async_trait]
pub trait ListStore: Send + Sync {
    async fn insert_list(&self, list: &List) -> Result<(), StoreError>;

    async fn lists_by_user(&self, user_id: &str) -> Result<Vec<List>, StoreError>;

    async fn list_by_id(&self, id: Uuid) -> Result<Option<List>, StoreError>;

    async fn update_list(&self, id: Uuid, changes: ListChanges) -> Result<Option<List>, StoreError>;

    async fn delete_list(&self, id: Uuid) -> Result<Option<List>, StoreError>;
}

/// Persistence for the `tasks` collection.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn insert_task(&self, task: &Task) -> Result<(), StoreError>;

    /// Tasks matching every set field of `filter`, in storage order.
    async fn find_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, StoreError>;

    async fn task_by_id(&self, id: Uuid) -> Result<Option<Task>, StoreError>;

    async fn update_task(&self, id: Uuid, changes: TaskChanges) -> Result<Option<Task>, StoreError>;

    async fn delete_task(&self, id: Uuid) -> Result<Option<Task>, StoreError>;
}

fn duplicate_list(name: &str) -> StoreError {
    StoreError::Conflict(format!("List with name {:?} already exists", name))
}

fn duplicate_task(name: &str) -> StoreError {
    StoreError::Conflict(format!("Task with name {:?} already exists", name))
}
