use super::error::ValidationError;
use super::types::{Activity, Todo};

/// Validates an activity before it is handed to the write queue.
pub fn validate_activity(activity: &Activity) -> Result<(), ValidationError> {
    if activity.title.is_empty() {
        return Err(ValidationError::TitleRequired);
    }
    Ok(())
}

/// Validates a todo before it is handed to the write queue.
/// The group ID is checked before the title.
pub fn validate_todo(todo: &Todo) -> Result<(), ValidationError> {
    if todo.activity_group_id == 0 {
        return Err(ValidationError::ActivityGroupIdRequired);
    }
    if todo.title.is_empty() {
        return Err(ValidationError::TitleRequired);
    }
    Ok(())
}

/// Filters todos by activity group. `None` keeps every todo.
pub fn filter_todos_by_group(todos: &[Todo], activity_group_id: Option<i64>) -> Vec<&Todo> {
    todos
        .iter()
        .filter(|todo| activity_group_id.is_none_or(|id| todo.activity_group_id == id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_activity_requires_title() {
        assert_eq!(
            validate_activity(&Activity::new("", "a@b.c")),
            Err(ValidationError::TitleRequired)
        );
        assert!(validate_activity(&Activity::new("Work", "")).is_ok());
    }

    #[test]
    fn test_validate_todo_checks_group_first() {
        assert_eq!(
            validate_todo(&Todo::new(0, "")),
            Err(ValidationError::ActivityGroupIdRequired)
        );
        assert_eq!(
            validate_todo(&Todo::new(1, "")),
            Err(ValidationError::TitleRequired)
        );
        assert!(validate_todo(&Todo::new(1, "buy milk")).is_ok());
    }

    #[test]
    fn test_filter_todos_by_group() {
        let todos = vec![
            Todo::new(1, "a").with_id(1),
            Todo::new(2, "b").with_id(2),
            Todo::new(1, "c").with_id(3),
        ];

        let filtered = filter_todos_by_group(&todos, Some(1));
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|t| t.activity_group_id == 1));

        assert_eq!(filter_todos_by_group(&todos, None).len(), 3);
    }
}
