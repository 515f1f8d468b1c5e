//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O. Primary keys use `AUTOINCREMENT` so IDs are never
//! reused and always increase.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
-- Activities table. Empty emails are stored as NULL so uniqueness only
-- applies to real addresses.
CREATE TABLE IF NOT EXISTS activities (
    activity_id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    email TEXT UNIQUE,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Todos table
CREATE TABLE IF NOT EXISTS todos (
    todo_id INTEGER PRIMARY KEY AUTOINCREMENT,
    activity_group_id INTEGER NOT NULL,
    title TEXT NOT NULL,
    is_active INTEGER NOT NULL DEFAULT 1,
    priority TEXT NOT NULL DEFAULT 'very-high',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Indexes for efficient queries
CREATE INDEX IF NOT EXISTS idx_todos_activity_group_id ON todos(activity_group_id);
"#;

// Activity queries
pub const INSERT_ACTIVITY: &str = r#"
INSERT INTO activities (title, email, created_at, updated_at)
VALUES (?1, NULLIF(?2, ''), ?3, ?4)
"#;

pub const SELECT_ACTIVITY_BY_ID: &str = r#"
SELECT activity_id, title, email, created_at, updated_at
FROM activities
WHERE activity_id = ?1
"#;

pub const SELECT_ALL_ACTIVITIES: &str = r#"
SELECT activity_id, title, email, created_at, updated_at
FROM activities
ORDER BY activity_id ASC
"#;

/// Email is fixed at creation and never rewritten.
pub const UPDATE_ACTIVITY: &str = r#"
UPDATE activities
SET title = ?2, updated_at = ?3
WHERE activity_id = ?1
"#;

pub const DELETE_ACTIVITY: &str = r#"
DELETE FROM activities
WHERE activity_id = ?1
"#;

pub const DELETE_ACTIVITY_WITH_TITLE: &str = r#"
DELETE FROM activities
WHERE activity_id = ?1 AND title = ?2
"#;

// Todo queries
pub const INSERT_TODO: &str = r#"
INSERT INTO todos (activity_group_id, title, is_active, priority, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

pub const SELECT_TODO_BY_ID: &str = r#"
SELECT todo_id, activity_group_id, title, is_active, priority, created_at, updated_at
FROM todos
WHERE todo_id = ?1
"#;

pub const SELECT_ALL_TODOS: &str = r#"
SELECT todo_id, activity_group_id, title, is_active, priority, created_at, updated_at
FROM todos
ORDER BY todo_id ASC
"#;

pub const SELECT_TODOS_BY_GROUP: &str = r#"
SELECT todo_id, activity_group_id, title, is_active, priority, created_at, updated_at
FROM todos
WHERE activity_group_id = ?1
ORDER BY todo_id ASC
"#;

pub const UPDATE_TODO: &str = r#"
UPDATE todos
SET title = ?2, is_active = ?3, priority = ?4, updated_at = ?5
WHERE todo_id = ?1
"#;

pub const DELETE_TODO: &str = r#"
DELETE FROM todos
WHERE todo_id = ?1
"#;

pub const DELETE_TODO_WITH_TITLE: &str = r#"
DELETE FROM todos
WHERE todo_id = ?1 AND title = ?2
"#;
