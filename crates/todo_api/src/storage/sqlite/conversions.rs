//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.
//! These are testable in isolation without database access.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Row;

use todo_api_core::todo::{Activity, Todo};

/// Convert a SQLite row to an Activity.
///
/// Expected columns: activity_id, title, email, created_at, updated_at
pub fn row_to_activity(row: &Row) -> rusqlite::Result<Activity> {
    let email: Option<String> = row.get(2)?;
    let created_at: String = row.get(3)?;
    let updated_at: String = row.get(4)?;

    Ok(Activity {
        id: row.get(0)?,
        title: row.get(1)?,
        email: email.unwrap_or_default(),
        created_at: parse_datetime(3, &created_at)?,
        updated_at: parse_datetime(4, &updated_at)?,
    })
}

/// Convert a SQLite row to a Todo.
///
/// Expected columns: todo_id, activity_group_id, title, is_active, priority, created_at, updated_at
pub fn row_to_todo(row: &Row) -> rusqlite::Result<Todo> {
    let created_at: String = row.get(5)?;
    let updated_at: String = row.get(6)?;

    Ok(Todo {
        id: row.get(0)?,
        activity_group_id: row.get(1)?,
        title: row.get(2)?,
        is_active: row.get(3)?,
        priority: row.get(4)?,
        created_at: parse_datetime(5, &created_at)?,
        updated_at: parse_datetime(6, &updated_at)?,
    })
}

fn parse_datetime(column: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                column,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}

/// Format a DateTime for SQLite storage, keeping full sub-second precision.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
