//! Cache key layout.
//!
//! Single entities live under `"<type>-<id>"` and list queries under
//! `"all<type>-<filter>"`, where a filter of `0` means unfiltered.

/// Returns the cache key for a single activity.
pub fn activity_key(activity_id: i64) -> String {
    format!("activity-{}", activity_id)
}

/// Returns the cache key for the list of all activities.
pub fn all_activities_key() -> String {
    "allactivity-0".to_string()
}

/// Returns the cache key for a single todo.
pub fn todo_key(todo_id: i64) -> String {
    format!("todo-{}", todo_id)
}

/// Returns the cache key for a todo list, optionally scoped to an activity group.
pub fn all_todos_key(activity_group_id: Option<i64>) -> String {
    format!("alltodo-{}", activity_group_id.unwrap_or(0))
}

/// Returns the Redis Set key that tracks every key written under a namespace.
///
/// Flushing reads this set instead of issuing `FLUSHDB`, so a shared Redis
/// instance only loses this service's entries.
pub fn tracking_key(namespace: &str) -> String {
    format!("{}:_keys", namespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_keys() {
        assert_eq!(activity_key(5), "activity-5");
        assert_eq!(all_activities_key(), "allactivity-0");
    }

    #[test]
    fn test_todo_keys() {
        assert_eq!(todo_key(7), "todo-7");
        assert_eq!(all_todos_key(None), "alltodo-0");
        assert_eq!(all_todos_key(Some(3)), "alltodo-3");
    }

    #[test]
    fn test_filtered_and_unfiltered_todo_lists_differ() {
        assert_ne!(all_todos_key(None), all_todos_key(Some(1)));
    }

    #[test]
    fn test_tracking_key() {
        assert_eq!(tracking_key("todo_api"), "todo_api:_keys");
    }
}
