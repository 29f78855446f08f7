pub mod routes;
pub mod service;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

pub use service::ListsService;

// MODELS

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct List {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub user_id: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateListRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "name should not be empty"))]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "user_id should not be empty"))]
    pub user_id: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateListRequest {
    #[validate(length(min = 1, message = "name should not be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "user_id should not be empty"))]
    pub user_id: Option<String>,
}

/// Fields to merge into a stored list. `None` leaves the stored value as is.
#[derive(Debug, Clone)]
pub struct ListChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub user_id: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl List {
    pub fn new(payload: CreateListRequest, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: payload.name,
            description: payload.description.unwrap_or_default(),
            user_id: payload.user_id,
            created_at: now,
            updated_at: now,
        }
    }
}

impl ListChanges {
    pub fn new(payload: UpdateListRequest, now: DateTime<Utc>) -> Self {
        Self {
            name: payload.name,
            description: payload.description,
            user_id: payload.user_id,
            updated_at: now,
        }
    }

    pub fn apply(&self, list: &mut List) {
        if let Some(name) = &self.name {
            list.name = name.clone();
        }
        if let Some(description) = &self.description {
            list.description = description.clone();
        }
        if let Some(user_id) = &self.user_id {
            list.user_id = user_id.clone();
        }
        list.updated_at = self.updated_at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_list_validation() {
        let valid = CreateListRequest {
            name: "Groceries".to_string(),
            description: None,
            user_id: "u1".to_string(),
        };
        assert!(valid.validate().is_ok());

        let missing: CreateListRequest = serde_json::from_str(r#"{"description":"x"}"#).unwrap();
        let errors = missing.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("user_id"));
    }

    #[test]
    fn test_update_list_validation() {
        assert!(UpdateListRequest::default().validate().is_ok());

        let blank_name = UpdateListRequest {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(blank_name.validate().is_err());
    }

    #[test]
    fn test_new_list_stamps_both_timestamps() {
        let now = Utc::now();
        let list = List::new(
            CreateListRequest {
                name: "Work".to_string(),
                description: None,
                user_id: "u1".to_string(),
            },
            now,
        );

        assert_eq!(list.created_at, list.updated_at);
        assert_eq!(list.description, "");
    }

    #[test]
    fn test_changes_only_touch_supplied_fields() {
        let created = Utc::now();
        let mut list = List::new(
            CreateListRequest {
                name: "Work".to_string(),
                description: Some("office".to_string()),
                user_id: "u1".to_string(),
            },
            created,
        );
        let later = created + chrono::Duration::seconds(5);

        ListChanges::new(
            UpdateListRequest {
                description: Some("remote".to_string()),
                ..Default::default()
            },
            later,
        )
        .apply(&mut list);

        assert_eq!(list.name, "Work");
        assert_eq!(list.description, "remote");
        assert_eq!(list.user_id, "u1");
        assert_eq!(list.created_at, created);
        assert_eq!(list.updated_at, later);
    }

    #[test]
    fn test_list_json_shape() {
        let list = List::new(
            CreateListRequest {
                name: "Work".to_string(),
                description: None,
                user_id: "u1".to_string(),
            },
            Utc::now(),
        );
        let value = serde_json::to_value(&list).unwrap();

        assert!(value.get("_id").is_some());
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
        assert_eq!(value["user_id"], "u1");
    }
}
