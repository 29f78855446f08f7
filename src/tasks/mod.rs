pub mod routes;
pub mod service;

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

pub use service::TasksService;

// MODELS

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Error, PartialEq)]
#[error("Priority must be one of: low, medium, high")]
pub struct InvalidPriority;

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = InvalidPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(InvalidPriority),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub is_complete: bool,
    pub due_date: DateTime<Utc>,
    pub priority: Priority,
    pub list_id: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "name should not be empty"))]
    pub name: String,
    pub description: Option<String>,
    pub is_complete: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_due_date")]
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Option<Priority>,
    #[serde(default)]
    #[validate(length(min = 1, message = "list_id should not be empty"))]
    pub list_id: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, message = "name should not be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_complete: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_due_date")]
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Option<Priority>,
    #[validate(length(min = 1, message = "list_id should not be empty"))]
    pub list_id: Option<String>,
}

/// Body of `PATCH /tasks/{id}/is-completed`.
#[derive(Debug, Deserialize)]
pub struct CompletionUpdate {
    #[serde(alias = "is_complete")]
    pub is_completed: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityQuery {
    pub priority: Option<String>,
    pub list_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionStatusQuery {
    pub list_id: Option<String>,
    pub is_completed: Option<bool>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct DeleteResponse {
    pub message: String,
}

/// Fields to merge into a stored task. `None` leaves the stored value as is.
#[derive(Debug, Clone)]
pub struct TaskChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_complete: Option<bool>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Option<Priority>,
    pub list_id: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Conjunction of optional equality filters over tasks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub list_id: Option<String>,
    pub priority: Option<Priority>,
    pub is_complete: Option<bool>,
}

impl CreateTaskRequest {
    /// Checks the payload and builds the record to insert. `due_date` and
    /// `priority` are reported next to the derived field errors.
    pub fn into_task(self, now: DateTime<Utc>) -> Result<Task, ValidationErrors> {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);
        if self.due_date.is_none() {
            errors.add("due_date", required("due_date must be a valid ISO 8601 date string"));
        }
        if self.priority.is_none() {
            errors.add("priority", required("priority must be one of: low, medium, high"));
        }

        match (self.due_date, self.priority) {
            (Some(due_date), Some(priority)) if errors.is_empty() => Ok(Task {
                id: Uuid::new_v4(),
                name: self.name,
                description: self.description.unwrap_or_default(),
                is_complete: self.is_complete.unwrap_or(false),
                due_date,
                priority,
                list_id: self.list_id,
                created_at: now,
                updated_at: now,
            }),
            _ => Err(errors),
        }
    }
}

impl TaskChanges {
    pub fn touch(now: DateTime<Utc>) -> Self {
        Self {
            name: None,
            description: None,
            is_complete: None,
            due_date: None,
            priority: None,
            list_id: None,
            updated_at: now,
        }
    }

    pub fn new(payload: UpdateTaskRequest, now: DateTime<Utc>) -> Self {
        Self {
            name: payload.name,
            description: payload.description,
            is_complete: payload.is_complete,
            due_date: payload.due_date,
            priority: payload.priority,
            list_id: payload.list_id,
            updated_at: now,
        }
    }

    pub fn apply(&self, task: &mut Task) {
        if let Some(name) = &self.name {
            task.name = name.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(is_complete) = self.is_complete {
            task.is_complete = is_complete;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(list_id) = &self.list_id {
            task.list_id = list_id.clone();
        }
        task.updated_at = self.updated_at;
    }
}

impl TaskFilter {
    pub fn list(list_id: impl Into<String>) -> Self {
        Self {
            list_id: Some(list_id.into()),
            ..Default::default()
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_completion(mut self, is_complete: bool) -> Self {
        self.is_complete = Some(is_complete);
        self
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.list_id.as_ref().map_or(true, |id| *id == task.list_id)
            && self.priority.map_or(true, |p| p == task.priority)
            && self.is_complete.map_or(true, |c| c == task.is_complete)
    }
}

// HELPER FUNCTIONS

fn required(message: &'static str) -> ValidationError {
    let mut error = ValidationError::new("required");
    error.message = Some(message.into());
    error
}

/// Accepts RFC 3339 timestamps, offset-less `YYYY-MM-DDTHH:MM:SS[.fff]`
/// datetimes and plain `YYYY-MM-DD` dates. Values without an offset are UTC.
pub fn parse_due_date(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(ts.and_utc());
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| format!("due_date must be a valid ISO 8601 date string, got {:?}", raw))
}

fn deserialize_due_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|s| parse_due_date(&s).map_err(serde::de::Error::custom))
        .transpose()
}
