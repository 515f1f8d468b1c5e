//! Use cases behind the HTTP handlers.
//!
//! Services validate requests before touching storage, turn missing rows
//! into [`RepositoryError::NotFound`](todo_api_core::storage::RepositoryError),
//! and apply the configured delete match. Errors are returned as
//! `anyhow::Error` wrapping the concrete error type so the handler layer can
//! downcast them into a status code.

mod activity;
mod todo;

pub use activity::ActivityService;
pub use todo::TodoService;
