//! Read-through caching and flush-on-write shared by the cached repositories.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;

use todo_api_core::cache::{deserialize_value, serialize_value, Cache};
use todo_api_core::storage::{RepositoryError, Result};
use todo_api_core::todo::Entity;

use super::mirror::MirrorTable;

/// Settings shared by every cached repository.
#[derive(Debug, Clone, Copy)]
pub struct CacheSettings {
    /// Time-to-live for cached entities and lists.
    pub ttl: Duration,
    /// Whether reads also keep an in-memory mirror of the table.
    pub mirror: bool,
}

/// Cache, mirror, and populate lock for one entity type.
///
/// The populate lock serializes miss handling so concurrent misses on the
/// same key hit the store once. Writers take it for their post-commit flush,
/// which means a reader that fetched pre-commit data has either already
/// populated (and gets flushed) or fetches again after the commit.
///
/// Clones share the cache, mirror, and lock.
pub(crate) struct CachePolicy<C: Cache, E: Entity> {
    cache: Arc<C>,
    ttl: Duration,
    mirror: Option<Arc<MirrorTable<E>>>,
    populate_lock: Arc<Mutex<()>>,
}

impl<C: Cache, E: Entity> Clone for CachePolicy<C, E> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            ttl: self.ttl,
            mirror: self.mirror.clone(),
            populate_lock: self.populate_lock.clone(),
        }
    }
}

impl<C, E> CachePolicy<C, E>
where
    C: Cache,
    E: Entity + Serialize + DeserializeOwned,
{
    pub fn new(cache: Arc<C>, settings: CacheSettings) -> Self {
        Self {
            cache,
            ttl: settings.ttl,
            mirror: settings.mirror.then(|| Arc::new(MirrorTable::new())),
            populate_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Reads and decodes a cached value. Any cache failure reads as a miss.
    async fn lookup<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.cache.get(key).await {
            Ok(Some(bytes)) => match deserialize_value(&bytes) {
                Ok(value) => {
                    tracing::trace!(key = %key, entity = E::KIND, "Cache hit");
                    Some(value)
                }
                Err(err) => {
                    tracing::warn!(key = %key, error = %err, "Cache value deserialization failed");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "Cache read failed");
                None
            }
        }
    }

    /// Best-effort cache write. Failures are logged and ignored.
    async fn populate<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        match serialize_value(value) {
            Ok(bytes) => {
                if let Err(err) = self.cache.set(key, &bytes, Some(self.ttl)).await {
                    tracing::warn!(key = %key, error = %err, "Failed to populate cache");
                }
            }
            Err(err) => tracing::warn!(key = %key, error = %err, "Cache value serialization failed"),
        }
    }

    /// Flushes the whole cache and drops the mirror.
    async fn flush(&self) {
        if let Err(err) = self.cache.flush_all().await {
            tracing::warn!(entity = E::KIND, error = %err, "Failed to flush cache");
        }
        if let Some(mirror) = &self.mirror {
            mirror.invalidate().await;
        }
    }

    /// Cache, then mirror, then store for a single entity.
    pub async fn get_or_fetch<F, Fut>(&self, key: String, id: i64, fetch: F) -> Result<Option<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<E>>>,
    {
        if let Some(entity) = self.lookup::<E>(&key).await {
            return Ok(Some(entity));
        }
        if let Some(mirror) = &self.mirror {
            if let Some(entity) = mirror.get(id).await {
                tracing::trace!(id, entity = E::KIND, "Mirror hit");
                return Ok(Some(entity));
            }
        }

        let _guard = self.populate_lock.lock().await;
        if let Some(entity) = self.lookup::<E>(&key).await {
            return Ok(Some(entity));
        }

        tracing::trace!(id, entity = E::KIND, "Cache miss");
        let fetched = fetch().await?;
        if let Some(entity) = &fetched {
            self.populate(&key, entity).await;
            if let Some(mirror) = &self.mirror {
                mirror.put(entity.clone()).await;
            }
        }
        Ok(fetched)
    }

    /// Cache, then mirror, then store for a list, optionally scoped to a group.
    pub async fn list_or_fetch<F, Fut>(
        &self,
        key: String,
        group: Option<i64>,
        fetch: F,
    ) -> Result<Vec<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<E>>>,
    {
        if let Some(list) = self.lookup::<Vec<E>>(&key).await {
            return Ok(list);
        }
        if let Some(mirror) = &self.mirror {
            if let Some(list) = mirror.list(group).await {
                tracing::trace!(key = %key, entity = E::KIND, "Mirror hit");
                return Ok(list);
            }
        }

        let _guard = self.populate_lock.lock().await;
        if let Some(list) = self.lookup::<Vec<E>>(&key).await {
            return Ok(list);
        }

        tracing::trace!(key = %key, entity = E::KIND, "Cache miss");
        let fetched = fetch().await?;
        self.populate(&key, &fetched).await;
        if let (Some(mirror), None) = (&self.mirror, group) {
            mirror.replace_all(fetched.clone()).await;
        }
        Ok(fetched)
    }

    #[cfg(test)]
    pub fn mirror(&self) -> Option<&MirrorTable<E>> {
        self.mirror.as_deref()
    }
}

impl<C, E> CachePolicy<C, E>
where
    C: Cache + 'static,
    E: Entity + Serialize + DeserializeOwned,
{
    /// Runs a store mutation between two flushes.
    ///
    /// The mutation and both flushes run on a spawned task that the caller
    /// only awaits. Dropping the caller does not cancel a write the store
    /// already accepted, and the post-commit flush still runs. The second
    /// flush happens under the populate lock whether or not the mutation
    /// succeeded.
    pub async fn write<T, Fut>(&self, mutation: Fut) -> Result<T>
    where
        T: Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let policy = self.clone();
        let task = tokio::spawn(async move {
            policy.flush().await;
            let result = mutation.await;

            let _guard = policy.populate_lock.lock().await;
            policy.flush().await;
            result
        });

        task.await.map_err(|err| {
            tracing::error!(entity = E::KIND, error = %err, "Write task failed");
            RepositoryError::InconsistentState(format!("{} write task failed: {err}", E::KIND))
        })?
    }
}
