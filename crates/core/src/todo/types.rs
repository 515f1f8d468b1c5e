use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Priority assigned to todos created without one.
pub const DEFAULT_PRIORITY: &str = "very-high";

/// A persisted record that flows through the write queue and the read cache.
///
/// The ID is assigned by the store, so entities built from requests carry
/// `0` until the write worker hands back the persisted copy.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Human-readable type name used in logs and error messages.
    const KIND: &'static str;

    fn id(&self) -> i64;

    /// Foreign key used for secondary indexing, if the entity has one.
    fn group_key(&self) -> Option<i64> {
        None
    }
}

/// Returns the current time, or one nanosecond past `previous` when the
/// clock has not moved past it.
fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + chrono::Duration::nanoseconds(1)
    }
}

/// An activity group that todos belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: i64,
    pub title: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Activity {
    /// Creates an unsaved activity stamped with the current time.
    pub fn new(title: impl Into<String>, email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            title: title.into(),
            email: email.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets a specific ID for this activity (useful for testing).
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    /// Marks the activity as modified now.
    pub fn touch(&mut self) {
        self.updated_at = next_timestamp(self.updated_at);
    }
}

impl Entity for Activity {
    const KIND: &'static str = "Activity";

    fn id(&self) -> i64 {
        self.id
    }
}

/// A todo item scoped to an activity group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub activity_group_id: i64,
    pub title: String,
    pub is_active: bool,
    pub priority: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Creates an unsaved, active todo with the default priority.
    pub fn new(activity_group_id: i64, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            activity_group_id,
            title: title.into(),
            is_active: true,
            priority: DEFAULT_PRIORITY.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets a specific ID for this todo (useful for testing).
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = priority.into();
        self
    }

    /// Marks the todo as modified now.
    pub fn touch(&mut self) {
        self.updated_at = next_timestamp(self.updated_at);
    }
}

impl Entity for Todo {
    const KIND: &'static str = "Todo";

    fn id(&self) -> i64 {
        self.id
    }

    fn group_key(&self) -> Option<i64> {
        Some(self.activity_group_id)
    }
}
