use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{duplicate_list, duplicate_task, ListStore, StoreError, TaskStore};
use crate::lists::{List, ListChanges};
use crate::tasks::{Task, TaskChanges, TaskFilter};

const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL-backed store over the `lists` and `tasks` tables.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_unique(err: sqlx::Error, conflict: impl FnOnce() -> StoreError) -> StoreError {
    let unique = err
        .as_database_error()
        .and_then(|db_error| db_error.code())
        .as_deref()
        == Some(UNIQUE_VIOLATION);

    if unique {
        conflict()
    } else {
        StoreError::Database(err)
    }
}

#[async_trait]
impl ListStore for PgStore {
    async fn insert_list(&self, list: &List) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO lists (id, name, description, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(list.id)
        .bind(&list.name)
        .bind(&list.description)
        .bind(&list.user_id)
        .bind(list.created_at)
        .bind(list.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique(e, || duplicate_list(&list.name)))?;

        Ok(())
    }

    async fn lists_by_user(&self, user_id: &str) -> Result<Vec<List>, StoreError> {
        let lists = sqlx::query_as::<_, List>(
            r#"
            SELECT * FROM lists
            WHERE user_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lists)
    }

    async fn list_by_id(&self, id: Uuid) -> Result<Option<List>, StoreError> {
        let list = sqlx::query_as::<_, List>("SELECT * FROM lists WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(list)
    }

    async fn update_list(&self, id: Uuid, changes: ListChanges) -> Result<Option<List>, StoreError> {
        sqlx::query_as::<_, List>(
            r#"
            UPDATE lists
            SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                user_id = COALESCE($4, user_id),
                updated_at = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(&changes.user_id)
        .bind(changes.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique(e, || duplicate_list(changes.name.as_deref().unwrap_or_default())))
    }

    async fn delete_list(&self, id: Uuid) -> Result<Option<List>, StoreError> {
        let list = sqlx::query_as::<_, List>("DELETE FROM lists WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(list)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn insert_task(&self, task: &Task) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO tasks (id, name, description, is_complete, due_date, priority, list_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(task.id)
        .bind(&task.name)
        .bind(&task.description)
        .bind(task.is_complete)
        .bind(task.due_date)
        .bind(task.priority)
        .bind(&task.list_id)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique(e, || duplicate_task(&task.name)))?;

        Ok(())
    }

    async fn find_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, StoreError> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM tasks WHERE TRUE");

        if let Some(list_id) = &filter.list_id {
            query.push(" AND list_id = ").push_bind(list_id.clone());
        }
        if let Some(priority) = filter.priority {
            query.push(" AND priority = ").push_bind(priority);
        }
        if let Some(is_complete) = filter.is_complete {
            query.push(" AND is_complete = ").push_bind(is_complete);
        }
        query.push(" ORDER BY created_at, id");

        let tasks = query
            .build_query_as::<Task>()
            .fetch_all(&self.pool)
            .await?;

        Ok(tasks)
    }

    async fn task_by_id(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let task = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(task)
    }

    async fn update_task(&self, id: Uuid, changes: TaskChanges) -> Result<Option<Task>, StoreError> {
        sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                is_complete = COALESCE($4, is_complete),
                due_date = COALESCE($5, due_date),
                priority = COALESCE($6, priority),
                list_id = COALESCE($7, list_id),
                updated_at = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(changes.is_complete)
        .bind(changes.due_date)
        .bind(changes.priority)
        .bind(&changes.list_id)
        .bind(changes.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique(e, || duplicate_task(changes.name.as_deref().unwrap_or_default())))
    }

    async fn delete_task(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let task = sqlx::query_as::<_, Task>("DELETE FROM tasks WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(task)
    }
}
