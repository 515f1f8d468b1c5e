mod error;
mod keys;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{activity_key, all_activities_key, all_todos_key, todo_key, tracking_key};
pub use serialization::{deserialize_value, serialize_value, SerializationError};
pub use traits::Cache;
