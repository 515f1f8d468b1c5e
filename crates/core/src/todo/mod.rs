mod dto;
mod error;
mod operations;
mod requests;
mod types;

pub use dto::{ActivityDto, TodoDto};
pub use error::ValidationError;
pub use operations::{filter_todos_by_group, validate_activity, validate_todo};
pub use requests::{
    CreateActivityRequest, CreateTodoRequest, ListTodosQuery, UpdateActivityRequest,
    UpdateTodoRequest,
};
pub use types::{Activity, Entity, Todo, DEFAULT_PRIORITY};
