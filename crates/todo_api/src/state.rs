//! Application state and dependency wiring.
//!
//! This module defines the shared application state that is passed to all
//! request handlers. `AppState::new` builds the whole graph (store, cache,
//! write workers, cached repositories, services) for the backend combination
//! selected via feature flags, and fails if any backend cannot start.

use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;

use todo_api_core::cache::Cache;
use todo_api_core::storage::{ActivityRepository, TodoRepository};
use todo_api_core::todo::{Activity, Todo};

use crate::config::Config;
use crate::service::{ActivityService, TodoService};
use crate::storage::cached::{CacheSettings, CachedActivityRepository, CachedTodoRepository};
use crate::storage::writer::{WorkerState, WriteQueue, WriteWorker};

// ============================================================================
// Compile-time feature validation
// ============================================================================

// Storage features: exactly one must be enabled, they are mutually exclusive
#[cfg(all(feature = "sqlite", feature = "inmemory"))]
compile_error!("Cannot enable both 'sqlite' and 'inmemory' storage features");

#[cfg(not(any(feature = "inmemory", feature = "sqlite")))]
compile_error!("Must enable exactly one storage feature: 'inmemory' or 'sqlite'");

// Cache features: exactly one must be enabled, they are mutually exclusive
#[cfg(all(feature = "memory", feature = "redis"))]
compile_error!("Cannot enable both 'memory' and 'redis' cache features");

#[cfg(not(any(feature = "memory", feature = "redis")))]
compile_error!("Must enable exactly one cache feature: 'memory' or 'redis'");

/// Shared application state.
///
/// This is cloned for each request handler. The services wrap the cached
/// repositories; the queues are kept for health reporting.
#[derive(Clone)]
pub struct AppState {
    /// Activity group use cases.
    pub activities: ActivityService,
    /// Todo item use cases.
    pub todos: TodoService,

    activity_writer: WriteQueue<Activity>,
    todo_writer: WriteQueue<Todo>,

    /// Shutdown signal sender for the write workers.
    pub shutdown_tx: broadcast::Sender<()>,
    /// Join handles of the write workers, taken on shutdown.
    workers: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl AppState {
    /// Starts both write workers and wraps `store` with caching.
    ///
    /// Must be called from within a tokio runtime.
    fn build<R, C>(store: Arc<R>, cache: Arc<C>, config: &Config) -> Self
    where
        R: ActivityRepository + TodoRepository + 'static,
        C: Cache + 'static,
    {
        let (shutdown_tx, _) = broadcast::channel(1);

        let (activity_writer, activity_worker) = WriteWorker::spawn::<Activity, R>(
            store.clone(),
            config.writer(),
            shutdown_tx.subscribe(),
        );
        let (todo_writer, todo_worker) =
            WriteWorker::spawn::<Todo, R>(store.clone(), config.writer(), shutdown_tx.subscribe());

        let settings = CacheSettings {
            ttl: config.cache_ttl(),
            mirror: config.mirror_enabled,
        };

        let activity_repo = Arc::new(CachedActivityRepository::new(
            store.clone(),
            activity_writer.clone(),
            cache.clone(),
            settings,
        ));
        let todo_repo = Arc::new(CachedTodoRepository::new(
            store,
            todo_writer.clone(),
            cache,
            settings,
        ));

        tracing::info!(
            delete_match = %config.delete_match,
            mirror = config.mirror_enabled,
            queue_capacity = config.write_queue_capacity,
            "Write workers started"
        );

        Self {
            activities: ActivityService::new(activity_repo, config.delete_match),
            todos: TodoService::new(todo_repo, config.delete_match),
            activity_writer,
            todo_writer,
            shutdown_tx,
            workers: Arc::new(Mutex::new(vec![activity_worker, todo_worker])),
        }
    }

    /// Current states of the activity and todo write workers.
    pub fn worker_states(&self) -> (WorkerState, WorkerState) {
        (self.activity_writer.state(), self.todo_writer.state())
    }

    /// Signal the write workers to stop after draining their queues.
    pub fn signal_shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Waits for the write workers to exit.
    pub async fn join_workers(&self) {
        let handles = std::mem::take(&mut *self.workers.lock().await);
        for handle in handles {
            if let Err(err) = handle.await {
                tracing::error!(error = %err, "Write worker panicked");
            }
        }
    }
}

// ============================================================================
// Factory functions for different backend combinations
// ============================================================================

#[cfg(all(feature = "sqlite", feature = "memory"))]
mod sqlite_memory {
    use super::*;
    use anyhow::Context;

    use crate::cache::memory::MemoryCache;
    use crate::storage::SqliteRepository;

    impl AppState {
        /// Creates AppState with SQLite storage and in-memory cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let sqlite_repo = Arc::new(
                SqliteRepository::new(&config.sqlite_path, config.db_busy_timeout())
                    .await
                    .with_context(|| {
                        format!("failed to open SQLite store at {}", config.sqlite_path)
                    })?,
            );
            let memory_cache = Arc::new(MemoryCache::new(config.cache_max_entries));

            Ok(Self::build(sqlite_repo, memory_cache, config))
        }
    }
}

#[cfg(all(feature = "sqlite", feature = "redis"))]
mod sqlite_redis {
    use super::*;
    use anyhow::Context;

    use crate::cache::redis_impl::RedisCache;
    use crate::storage::SqliteRepository;

    impl AppState {
        /// Creates AppState with SQLite storage and Redis cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let sqlite_repo = Arc::new(
                SqliteRepository::new(&config.sqlite_path, config.db_busy_timeout())
                    .await
                    .with_context(|| {
                        format!("failed to open SQLite store at {}", config.sqlite_path)
                    })?,
            );
            let redis_cache = Arc::new(
                RedisCache::new(&config.redis_url)
                    .await
                    .with_context(|| {
                        format!("failed to connect to Redis at {}", config.redis_url)
                    })?,
            );

            Ok(Self::build(sqlite_repo, redis_cache, config))
        }
    }
}

#[cfg(all(feature = "inmemory", feature = "memory"))]
mod inmemory_memory {
    use super::*;

    use crate::cache::memory::MemoryCache;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates AppState with in-memory storage and cache.
        /// Useful for testing without any external dependencies.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let inmemory_repo = Arc::new(InMemoryRepository::new());
            let memory_cache = Arc::new(MemoryCache::new(config.cache_max_entries));

            Ok(Self::build(inmemory_repo, memory_cache, config))
        }
    }
}

#[cfg(all(feature = "inmemory", feature = "redis"))]
mod inmemory_redis {
    use super::*;
    use anyhow::Context;

    use crate::cache::redis_impl::RedisCache;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates AppState with in-memory storage and Redis cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let inmemory_repo = Arc::new(InMemoryRepository::new());
            let redis_cache = Arc::new(
                RedisCache::new(&config.redis_url)
                    .await
                    .with_context(|| {
                        format!("failed to connect to Redis at {}", config.redis_url)
                    })?,
            );

            Ok(Self::build(inmemory_repo, redis_cache, config))
        }
    }
}

// ============================================================================
// Test support - in-memory state for handler tests
// ============================================================================

#[cfg(test)]
mod test_support {
    use super::*;

    use crate::cache::memory::MemoryCache;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates an AppState backed by the in-memory store and cache.
        ///
        /// Spawns the write workers, so it needs a running tokio runtime.
        pub fn for_tests(config: &Config) -> Self {
            let repo = Arc::new(InMemoryRepository::new());
            let cache = Arc::new(MemoryCache::new(config.cache_max_entries));
            Self::build(repo, cache, config)
        }
    }

    #[tokio::test]
    async fn test_shutdown_stops_both_workers() {
        let state = AppState::for_tests(&Config::defaults());

        state.signal_shutdown();
        state.join_workers().await;

        assert_eq!(
            state.worker_states(),
            (WorkerState::Stopped, WorkerState::Stopped)
        );
    }
}
