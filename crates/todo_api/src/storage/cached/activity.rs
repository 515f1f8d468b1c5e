//! Cached activity repository.

use std::sync::Arc;

use async_trait::async_trait;

use todo_api_core::cache::{activity_key, all_activities_key, Cache};
use todo_api_core::storage::{ActivityRepository, Result};
use todo_api_core::todo::Activity;

use super::policy::{CachePolicy, CacheSettings};
use crate::storage::writer::WriteQueue;

/// Activity repository with read-through caching and write-behind inserts.
///
/// Reads go cache, then mirror, then store. Inserts go through the activity
/// write worker. Every mutation flushes the cache before and after the write.
pub struct CachedActivityRepository<R, C>
where
    R: ActivityRepository,
    C: Cache,
{
    repository: Arc<R>,
    writer: WriteQueue<Activity>,
    policy: CachePolicy<C, Activity>,
}

impl<R, C> CachedActivityRepository<R, C>
where
    R: ActivityRepository,
    C: Cache,
{
    pub fn new(
        repository: Arc<R>,
        writer: WriteQueue<Activity>,
        cache: Arc<C>,
        settings: CacheSettings,
    ) -> Self {
        Self {
            repository,
            writer,
            policy: CachePolicy::new(cache, settings),
        }
    }
}

#[async_trait]
impl<R, C> ActivityRepository for CachedActivityRepository<R, C>
where
    R: ActivityRepository + 'static,
    C: Cache + 'static,
{
    async fn get_activity(&self, id: i64) -> Result<Option<Activity>> {
        self.policy
            .get_or_fetch(activity_key(id), id, || self.repository.get_activity(id))
            .await
    }

    async fn list_activities(&self) -> Result<Vec<Activity>> {
        self.policy
            .list_or_fetch(all_activities_key(), None, || {
                self.repository.list_activities()
            })
            .await
    }

    async fn insert_activity(&self, activity: Activity) -> Result<Activity> {
        let writer = self.writer.clone();
        let stored = self
            .policy
            .write(async move { writer.submit(activity).await })
            .await?;
        tracing::debug!(id = stored.id, "Activity inserted");
        Ok(stored)
    }

    async fn update_activity(&self, activity: &Activity) -> Result<()> {
        let repository = self.repository.clone();
        let activity = activity.clone();
        self.policy
            .write(async move { repository.update_activity(&activity).await })
            .await
    }

    async fn delete_activity(&self, id: i64, title: Option<&str>) -> Result<()> {
        let repository = self.repository.clone();
        let title = title.map(str::to_owned);
        self.policy
            .write(async move { repository.delete_activity(id, title.as_deref()).await })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
    use std::time::Duration;

    use tokio::sync::{broadcast, RwLock};

    use todo_api_core::cache::{CacheError, Result as CacheResult};
    use todo_api_core::storage::RepositoryError;

    use crate::cache::MemoryCache;
    use crate::storage::writer::{WriteWorker, WriterConfig};

    // Mock repository that counts store reads
    struct MockActivityRepository {
        activities: RwLock<BTreeMap<i64, Activity>>,
        seq: AtomicI64,
        get_calls: AtomicUsize,
        list_calls: AtomicUsize,
        fail_inserts: bool,
    }

    impl MockActivityRepository {
        fn new() -> Self {
            Self {
                activities: RwLock::new(BTreeMap::new()),
                seq: AtomicI64::new(0),
                get_calls: AtomicUsize::new(0),
                list_calls: AtomicUsize::new(0),
                fail_inserts: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail_inserts: true,
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl ActivityRepository for MockActivityRepository {
        async fn get_activity(&self, id: i64) -> Result<Option<Activity>> {
            self.get_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.activities.read().await.get(&id).cloned())
        }

        async fn list_activities(&self) -> Result<Vec<Activity>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.activities.read().await.values().cloned().collect())
        }

        async fn insert_activity(&self, activity: Activity) -> Result<Activity> {
            if self.fail_inserts {
                return Err(RepositoryError::Constraint(
                    "UNIQUE constraint failed: activities.email".to_string(),
                ));
            }
            let id = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
            let stored = activity.with_id(id);
            self.activities.write().await.insert(id, stored.clone());
            Ok(stored)
        }

        async fn update_activity(&self, activity: &Activity) -> Result<()> {
            let mut activities = self.activities.write().await;
            match activities.get_mut(&activity.id) {
                Some(existing) => {
                    *existing = activity.clone();
                    Ok(())
                }
                None => Err(RepositoryError::NotFound {
                    entity_type: "Activity",
                    id: activity.id,
                }),
            }
        }

        async fn delete_activity(&self, id: i64, _title: Option<&str>) -> Result<()> {
            self.activities
                .write()
                .await
                .remove(&id)
                .map(|_| ())
                .ok_or(RepositoryError::NotFound {
                    entity_type: "Activity",
                    id,
                })
        }
    }

    // Cache whose every operation fails
    struct BrokenCache;

    fn down<T>() -> CacheResult<T> {
        Err(CacheError::ConnectionFailed("down".to_string()))
    }

    #[async_trait]
    impl Cache for BrokenCache {
        async fn get(&self, _key: &str) -> CacheResult<Option<Vec<u8>>> {
            down()
        }

        async fn set(&self, _key: &str, _value: &[u8], _ttl: Option<Duration>) -> CacheResult<()> {
            down()
        }

        async fn delete(&self, _key: &str) -> CacheResult<()> {
            down()
        }

        async fn flush_all(&self) -> CacheResult<()> {
            down()
        }
    }

    fn settings(mirror: bool) -> CacheSettings {
        CacheSettings {
            ttl: Duration::from_secs(300),
            mirror,
        }
    }

    fn build<C: Cache + 'static>(
        repo: Arc<MockActivityRepository>,
        cache: Arc<C>,
        mirror: bool,
    ) -> (
        CachedActivityRepository<MockActivityRepository, C>,
        broadcast::Sender<()>,
    ) {
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let (writer, _handle) = WriteWorker::spawn::<Activity, _>(
            repo.clone(),
            WriterConfig::default(),
            shutdown_rx,
        );
        (
            CachedActivityRepository::new(repo, writer, cache, settings(mirror)),
            shutdown_tx,
        )
    }

    #[tokio::test]
    async fn test_get_activity_cache_miss_then_hit() {
        let repo = Arc::new(MockActivityRepository::new());
        let cache = Arc::new(MemoryCache::new(100));
        let (cached, _shutdown) = build(repo.clone(), cache.clone(), false);

        let stored = cached
            .insert_activity(Activity::new("Work", "a@b.c"))
            .await
            .unwrap();

        let first = cached.get_activity(stored.id).await.unwrap().unwrap();
        let second = cached.get_activity(stored.id).await.unwrap().unwrap();

        assert_eq!(first, second);
        assert_eq!(repo.get_calls.load(Ordering::SeqCst), 1);
        assert!(cache.get(&activity_key(stored.id)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_missing_activity_is_not_cached() {
        let repo = Arc::new(MockActivityRepository::new());
        let cache = Arc::new(MemoryCache::new(100));
        let (cached, _shutdown) = build(repo.clone(), cache.clone(), false);

        assert!(cached.get_activity(42).await.unwrap().is_none());
        assert!(cached.get_activity(42).await.unwrap().is_none());

        assert_eq!(repo.get_calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_insert_flushes_cached_list() {
        let repo = Arc::new(MockActivityRepository::new());
        let cache = Arc::new(MemoryCache::new(100));
        let (cached, _shutdown) = build(repo.clone(), cache, false);

        cached
            .insert_activity(Activity::new("one", ""))
            .await
            .unwrap();
        assert_eq!(cached.list_activities().await.unwrap().len(), 1);

        cached
            .insert_activity(Activity::new("two", ""))
            .await
            .unwrap();
        assert_eq!(cached.list_activities().await.unwrap().len(), 2);
        assert_eq!(repo.list_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_update_flushes_cached_entity() {
        let repo = Arc::new(MockActivityRepository::new());
        let cache = Arc::new(MemoryCache::new(100));
        let (cached, _shutdown) = build(repo.clone(), cache, true);

        let mut stored = cached
            .insert_activity(Activity::new("before", ""))
            .await
            .unwrap();
        cached.get_activity(stored.id).await.unwrap();

        stored.title = "after".to_string();
        cached.update_activity(&stored).await.unwrap();

        let fetched = cached.get_activity(stored.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "after");
        assert_eq!(repo.get_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_delete_flushes_cache_and_mirror() {
        let repo = Arc::new(MockActivityRepository::new());
        let cache = Arc::new(MemoryCache::new(100));
        let (cached, _shutdown) = build(repo.clone(), cache.clone(), true);

        let stored = cached
            .insert_activity(Activity::new("gone", ""))
            .await
            .unwrap();
        cached.list_activities().await.unwrap();
        assert_eq!(cached.policy.mirror().unwrap().len().await, 1);

        cached.delete_activity(stored.id, None).await.unwrap();

        assert_eq!(cache.len().await, 0);
        assert_eq!(cached.policy.mirror().unwrap().len().await, 0);
        assert!(cached.get_activity(stored.id).await.unwrap().is_none());
        assert!(cached.list_activities().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mirror_answers_after_cache_entry_expires() {
        let repo = Arc::new(MockActivityRepository::new());
        let cache = Arc::new(MemoryCache::new(100));
        let (cached, _shutdown) = build(repo.clone(), cache.clone(), true);

        cached
            .insert_activity(Activity::new("listed", ""))
            .await
            .unwrap();
        cached.list_activities().await.unwrap();

        // Evict the cache without a mutation so only the mirror remains
        cache.flush_all().await.unwrap();

        assert_eq!(cached.list_activities().await.unwrap().len(), 1);
        assert!(cached.get_activity(1).await.unwrap().is_some());
        assert_eq!(repo.list_calls.load(Ordering::SeqCst), 1);
        assert_eq!(repo.get_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_worker_failure_reaches_caller() {
        let repo = Arc::new(MockActivityRepository::failing());
        let cache = Arc::new(MemoryCache::new(100));
        let (cached, _shutdown) = build(repo, cache, false);

        let err = cached
            .insert_activity(Activity::new("dup", "a@b.c"))
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::Constraint(_)));
    }

    #[tokio::test]
    async fn test_cache_failures_fall_back_to_store() {
        let repo = Arc::new(MockActivityRepository::new());
        let (cached, _shutdown) = build(repo.clone(), Arc::new(BrokenCache), false);

        let stored = cached
            .insert_activity(Activity::new("still works", ""))
            .await
            .unwrap();

        assert_eq!(
            cached.get_activity(stored.id).await.unwrap().unwrap().title,
            "still works"
        );
        assert_eq!(cached.list_activities().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_misses_read_store_once() {
        let repo = Arc::new(MockActivityRepository::new());
        let cache = Arc::new(MemoryCache::new(100));
        let (cached, _shutdown) = build(repo.clone(), cache, false);
        let cached = Arc::new(cached);

        let stored = cached
            .insert_activity(Activity::new("hot", ""))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..10 {
            let cached = cached.clone();
            handles.push(tokio::spawn(async move {
                cached.get_activity(stored.id).await.unwrap()
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap().is_some());
        }

        assert_eq!(repo.get_calls.load(Ordering::SeqCst), 1);
    }
}
