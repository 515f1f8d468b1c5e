//! Redis cache implementation.
//!
//! Every key is written under a namespace prefix and recorded in a tracking
//! set, so `flush_all` removes exactly this service's entries without
//! `FLUSHDB` or `SCAN`.
//!
//! A write and its tracking entry go out as one `MULTI`/`EXEC` block, and a
//! flush runs as a single Lua script. Neither can interleave with the other,
//! so every live key stays tracked.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use todo_api_core::cache::{tracking_key, Cache, Result};

use super::error::map_redis_error;

/// Namespace used when none is given.
pub const DEFAULT_NAMESPACE: &str = "todo_api";

// KEYS[1] is the tracking set. Members are deleted in chunks to stay under
// Lua's unpack limit.
static FLUSH_TRACKED: LazyLock<redis::Script> = LazyLock::new(|| {
    redis::Script::new(
        r"
        local members = redis.call('SMEMBERS', KEYS[1])
        for i = 1, #members, 1000 do
            redis.call('DEL', unpack(members, i, math.min(i + 999, #members)))
        end
        redis.call('DEL', KEYS[1])
        return #members
        ",
    )
});

/// Redis cache backend using connection manager for pooling.
pub struct RedisCache {
    conn: redis::aio::ConnectionManager,
    namespace: String,
}

impl RedisCache {
    /// Creates a new Redis cache connection under the default namespace.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::ConnectionFailed` if the connection cannot be established.
    pub async fn new(url: &str) -> Result<Self> {
        Self::with_namespace(url, DEFAULT_NAMESPACE).await
    }

    /// Creates a new Redis cache connection whose keys live under `namespace`.
    pub async fn with_namespace(url: &str, namespace: impl Into<String>) -> Result<Self> {
        let client = redis::Client::open(url).map_err(map_redis_error)?;
        let conn = redis::aio::ConnectionManager::new(client)
            .await
            .map_err(map_redis_error)?;
        Ok(Self {
            conn,
            namespace: namespace.into(),
        })
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}:{}", self.namespace, key)
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let result: Option<Vec<u8>> = conn
            .get(self.namespaced(key))
            .await
            .map_err(map_redis_error)?;
        Ok(result)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let mut conn = self.conn.clone();
        let full_key = self.namespaced(key);

        let mut pipe = redis::pipe();
        pipe.atomic();
        match ttl {
            Some(duration) => {
                pipe.set_ex(&full_key, value, duration.as_secs().max(1))
                    .ignore();
            }
            None => {
                pipe.set(&full_key, value).ignore();
            }
        }
        pipe.sadd(tracking_key(&self.namespace), &full_key).ignore();

        let (): () = pipe.query_async(&mut conn).await.map_err(map_redis_error)?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        let full_key = self.namespaced(key);

        let (): () = redis::pipe()
            .atomic()
            .srem(tracking_key(&self.namespace), &full_key)
            .ignore()
            .del(&full_key)
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(map_redis_error)?;

        Ok(())
    }

    async fn flush_all(&self) -> Result<()> {
        let mut conn = self.conn.clone();

        let removed: i64 = FLUSH_TRACKED
            .key(tracking_key(&self.namespace))
            .invoke_async(&mut conn)
            .await
            .map_err(map_redis_error)?;
        tracing::trace!(namespace = %self.namespace, removed, "Flushed tracked cache keys");

        Ok(())
    }
}
