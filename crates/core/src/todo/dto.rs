//! Wire representations of activities and todos.
//!
//! Field names match the public JSON contract: identifiers and flags are
//! snake_case while timestamps are camelCase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::{Activity, Todo};

/// Externally serialized view of an [`Activity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDto {
    pub id: i64,
    pub title: String,
    pub email: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl From<Activity> for ActivityDto {
    fn from(activity: Activity) -> Self {
        Self {
            id: activity.id,
            title: activity.title,
            email: activity.email,
            created_at: activity.created_at,
            updated_at: activity.updated_at,
        }
    }
}

/// Externally serialized view of a [`Todo`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoDto {
    pub id: i64,
    pub title: String,
    pub activity_group_id: i64,
    pub is_active: bool,
    pub priority: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl From<Todo> for TodoDto {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id,
            title: todo.title,
            activity_group_id: todo.activity_group_id,
            is_active: todo.is_active,
            priority: todo.priority,
            created_at: todo.created_at,
            updated_at: todo.updated_at,
        }
    }
}
