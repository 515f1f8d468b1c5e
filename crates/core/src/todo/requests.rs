//! API request types for activity and todo operations.
//!
//! Pure data types with no I/O. Create requests convert into unsaved
//! entities; update requests apply only the fields the caller supplied.

use serde::{Deserialize, Serialize};

use super::types::{Activity, Todo};

/// Request payload for creating a new activity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateActivityRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl CreateActivityRequest {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Convert into an unsaved Activity. Missing fields become empty strings.
    pub fn into_activity(self) -> Activity {
        Activity::new(
            self.title.unwrap_or_default(),
            self.email.unwrap_or_default(),
        )
    }
}

/// Request payload for updating an activity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateActivityRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl UpdateActivityRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Apply this update to an existing activity and bump its `updated_at`.
    pub fn apply_to(self, activity: &mut Activity) {
        if let Some(title) = self.title.filter(|t| !t.is_empty()) {
            activity.title = title;
        }
        activity.touch();
    }
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTodoRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub activity_group_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl CreateTodoRequest {
    pub fn new(activity_group_id: i64, title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            activity_group_id,
            is_active: None,
        }
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    /// Convert into an unsaved Todo. `is_active` defaults to true.
    pub fn into_todo(self) -> Todo {
        Todo::new(self.activity_group_id, self.title.unwrap_or_default())
            .with_active(self.is_active.unwrap_or(true))
    }
}

/// Request payload for partially updating a todo.
///
/// `status` is accepted for compatibility with existing clients and does
/// not map to any stored field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl UpdateTodoRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    /// Apply the supplied fields to an existing todo and bump its `updated_at`.
    /// Empty strings count as "not supplied".
    pub fn apply_to(self, todo: &mut Todo) {
        if let Some(title) = self.title.filter(|t| !t.is_empty()) {
            todo.title = title;
        }
        if let Some(priority) = self.priority.filter(|p| !p.is_empty()) {
            todo.priority = priority;
        }
        if let Some(is_active) = self.is_active {
            todo.is_active = is_active;
        }
        todo.touch();
    }
}

/// Query parameters for listing todos.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListTodosQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_group_id: Option<i64>,
}

impl ListTodosQuery {
    /// Returns the group filter, treating `0` as "no filter".
    pub fn filter(&self) -> Option<i64> {
        self.activity_group_id.filter(|id| *id != 0)
    }
}
