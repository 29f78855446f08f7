use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{duplicate_list, duplicate_task, ListStore, StoreError, TaskStore};
use crate::lists::{List, ListChanges};
use crate::tasks::{Task, TaskChanges, TaskFilter};

/// In-process store. Records are kept in insertion order.
#[derive(Clone, Default)]
pub struct MemoryStore {
    lists: Arc<RwLock<Vec<List>>>,
    tasks: Arc<RwLock<Vec<Task>>>,
}

#[cfg(test)]
impl MemoryStore {
    pub async fn list_count(&self) -> usize {
        self.lists.read().await.len()
    }

    pub async fn task_count(&self) -> usize {
        self.tasks.read().await.len()
    }
}

#[async_trait]
impl ListStore for MemoryStore {
    async fn insert_list(&self, list: &List) -> Result<(), StoreError> {
        let mut lists = self.lists.write().await;
        if lists.iter().any(|l| l.name == list.name) {
            return Err(duplicate_list(&list.name));
        }
        lists.push(list.clone());
        Ok(())
    }

    async fn lists_by_user(&self, user_id: &str) -> Result<Vec<List>, StoreError> {
        let lists = self.lists.read().await;
        Ok(lists.iter().filter(|l| l.user_id == user_id).cloned().collect())
    }

    async fn list_by_id(&self, id: Uuid) -> Result<Option<List>, StoreError> {
        let lists = self.lists.read().await;
        Ok(lists.iter().find(|l| l.id == id).cloned())
    }

    async fn update_list(&self, id: Uuid, changes: ListChanges) -> Result<Option<List>, StoreError> {
        let mut lists = self.lists.write().await;
        let Some(idx) = lists.iter().position(|l| l.id == id) else {
            return Ok(None);
        };

        if let Some(name) = &changes.name {
            if lists.iter().any(|l| l.id != id && l.name == *name) {
                return Err(duplicate_list(name));
            }
        }

        let list = &mut lists[idx];
        changes.apply(list);
        Ok(Some(list.clone()))
    }

    async fn delete_list(&self, id: Uuid) -> Result<Option<List>, StoreError> {
        let mut lists = self.lists.write().await;
        Ok(lists
            .iter()
            .position(|l| l.id == id)
            .map(|idx| lists.remove(idx)))
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn insert_task(&self, task: &Task) -> Result<(), StoreError> {
        let mut tasks = self.tasks.write().await;
        if tasks.iter().any(|t| t.name == task.name) {
            return Err(duplicate_task(&task.name));
        }
        tasks.push(task.clone());
        Ok(())
    }

    async fn find_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, StoreError> {
        let tasks = self.tasks.read().await;
        Ok(tasks.iter().filter(|t| filter.matches(t)).cloned().collect())
    }

    async fn task_by_id(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let tasks = self.tasks.read().await;
        Ok(tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn update_task(&self, id: Uuid, changes: TaskChanges) -> Result<Option<Task>, StoreError> {
        let mut tasks = self.tasks.write().await;
        let Some(idx) = tasks.iter().position(|t| t.id == id) else {
            return Ok(None);
        };

        if let Some(name) = &changes.name {
            if tasks.iter().any(|t| t.id != id && t.name == *name) {
                return Err(duplicate_task(name));
            }
        }

        let task = &mut tasks[idx];
        changes.apply(task);
        Ok(Some(task.clone()))
    }

    async fn delete_task(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let mut tasks = self.tasks.write().await;
        Ok(tasks
            .iter()
            .position(|t| t.id == id)
            .map(|idx| tasks.remove(idx)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::Priority;
    use chrono::Utc;

    fn list(name: &str) -> List {
        let now = Utc::now();
        List {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: String::new(),
            user_id: "u1".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn task(name: &str) -> Task {
        let now = Utc::now();
        Task {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: String::new(),
            is_complete: false,
            due_date: now,
            priority: Priority::Medium,
            list_id: "L1".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_rename_onto_existing_name_conflicts() {
        let store = MemoryStore::default();
        let first = list("first");
        let second = list("second");
        store.insert_list(&first).await.unwrap();
        store.insert_list(&second).await.unwrap();

        let changes = ListChanges {
            name: Some("first".to_string()),
            description: None,
            user_id: None,
            updated_at: Utc::now(),
        };
        let err = store.update_list(second.id, changes).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        // keeping its own name is fine
        let changes = ListChanges {
            name: Some("first".to_string()),
            description: Some("same".to_string()),
            user_id: None,
            updated_at: Utc::now(),
        };
        let updated = store.update_list(first.id, changes).await.unwrap().unwrap();
        assert_eq!(updated.description, "same");
    }

    #[tokio::test]
    async fn test_delete_task_removes_only_that_record() {
        let store = MemoryStore::default();
        let a = task("a");
        let b = task("b");
        store.insert_task(&a).await.unwrap();
        store.insert_task(&b).await.unwrap();

        assert_eq!(store.delete_task(a.id).await.unwrap(), Some(a.clone()));
        assert_eq!(store.delete_task(a.id).await.unwrap(), None);
        assert_eq!(store.find_tasks(&TaskFilter::default()).await.unwrap(), vec![b]);
    }

    #[tokio::test]
    async fn test_duplicate_task_name() {
        let store = MemoryStore::default();
        store.insert_task(&task("a")).await.unwrap();

        let err = store.insert_task(&task("a")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }
}
