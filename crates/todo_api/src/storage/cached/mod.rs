//! Cached repository decorators.
//!
//! The decorators wrap a repository with read-through caching and route
//! inserts through the entity's write worker:
//!
//! - **Reads**: check the cache, then the mirror, then the store, populating
//!   both on the way back
//! - **Writes**: flush the cache, write (inserts wait for the worker's ack),
//!   then flush again, all on a spawned task so a dropped request cannot
//!   skip the second flush
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let repo = Arc::new(SqliteRepository::new("todo_api.db", Duration::from_secs(10)).await?);
//! let cache = Arc::new(MemoryCache::new(10_000));
//! let (queue, _worker) = WriteWorker::spawn::<Todo, _>(repo.clone(), WriterConfig::default(), shutdown_rx);
//!
//! let settings = CacheSettings { ttl: Duration::from_secs(300), mirror: true };
//! let cached_repo = CachedTodoRepository::new(repo, queue, cache, settings);
//! ```

mod activity;
mod mirror;
mod policy;
mod todo;

pub use activity::CachedActivityRepository;
pub use policy::CacheSettings;
pub use todo::CachedTodoRepository;
