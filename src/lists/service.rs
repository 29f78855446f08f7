use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use super::{CreateListRequest, List, ListChanges, UpdateListRequest};
use crate::error::AppError;
use crate::store::ListStore;

#[derive(Clone)]
pub struct ListsService {
    store: Arc<dyn ListStore>,
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("List with id {} not found", id))
}

impl ListsService {
    pub fn new(store: Arc<dyn ListStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, payload: CreateListRequest) -> Result<List, AppError> {
        payload.validate()?;

        let list = List::new(payload, Utc::now());
        self.store.insert_list(&list).await?;

        Ok(list)
    }

    /// Lists owned by `user_id`, in storage order.
    pub async fn find_all(&self, user_id: &str) -> Result<Vec<List>, AppError> {
        Ok(self.store.lists_by_user(user_id).await?)
    }

    pub async fn find_one(&self, id: Uuid) -> Result<List, AppError> {
        self.store.list_by_id(id).await?.ok_or_else(|| not_found(id))
    }

    pub async fn update(&self, id: Uuid, payload: UpdateListRequest) -> Result<List, AppError> {
        payload.validate()?;

        let changes = ListChanges::new(payload, Utc::now());
        self.store
            .update_list(id, changes)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Deletes the list and returns it. Tasks pointing at it are left alone.
    pub async fn remove(&self, id: Uuid) -> Result<List, AppError> {
        self.store.delete_list(id).await?.ok_or_else(|| not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::Duration;

    fn service() -> (ListsService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::default());
        (ListsService::new(store.clone()), store)
    }

    fn payload(name: &str, user_id: &str) -> CreateListRequest {
        CreateListRequest {
            name: name.to_string(),
            description: Some("things".to_string()),
            user_id: user_id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_persists_with_equal_timestamps() {
        let (lists, _) = service();

        let created = lists.create(payload("Groceries", "u1")).await.unwrap();
        assert_eq!(created.created_at, created.updated_at);

        let fetched = lists.find_one(created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_rejects_empty_name_before_store() {
        let (lists, store) = service();

        let err = lists.create(payload("", "u1")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(store.list_count().await, 0);
    }

    #[tokio::test]
    async fn test_duplicate_name_conflicts() {
        let (lists, _) = service();

        lists.create(payload("Groceries", "u1")).await.unwrap();
        let err = lists.create(payload("Groceries", "u2")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_find_all_filters_by_user_in_insertion_order() {
        let (lists, _) = service();

        let a = lists.create(payload("A", "u1")).await.unwrap();
        lists.create(payload("B", "u2")).await.unwrap();
        let c = lists.create(payload("C", "u1")).await.unwrap();

        let owned = lists.find_all("u1").await.unwrap();
        let ids: Vec<Uuid> = owned.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![a.id, c.id]);

        assert!(lists.find_all("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_merges_and_refreshes_updated_at() {
        let (lists, store) = service();
        let then = Utc::now() - Duration::hours(1);
        let created = List {
            id: Uuid::new_v4(),
            name: "Groceries".to_string(),
            description: "things".to_string(),
            user_id: "u1".to_string(),
            created_at: then,
            updated_at: then,
        };
        store.insert_list(&created).await.unwrap();

        let updated = lists
            .update(
                created.id,
                UpdateListRequest {
                    name: Some("Shopping".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Shopping");
        assert_eq!(updated.description, "things");
        assert_eq!(updated.user_id, "u1");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
    }

    #[tokio::test]
    async fn test_update_missing_list_with_taken_name_is_not_found() {
        let (lists, _) = service();
        lists.create(payload("taken", "u1")).await.unwrap();

        let result = lists
            .update(
                Uuid::new_v4(),
                UpdateListRequest {
                    name: Some("taken".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_missing_ids_raise_not_found() {
        let (lists, _) = service();
        let id = Uuid::new_v4();

        assert!(matches!(lists.find_one(id).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            lists.update(id, UpdateListRequest::default()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(lists.remove(id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_remove_returns_deleted_list() {
        let (lists, _) = service();
        let created = lists.create(payload("Groceries", "u1")).await.unwrap();

        let removed = lists.remove(created.id).await.unwrap();
        assert_eq!(removed.id, created.id);
        assert!(matches!(lists.find_one(created.id).await, Err(AppError::NotFound(_))));
    }
}
