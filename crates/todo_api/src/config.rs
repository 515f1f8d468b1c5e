use std::{env, str::FromStr, time::Duration};

use todo_api_core::storage::DeleteMatch;

use crate::storage::writer::WriterConfig;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cache TTL in seconds (default: 300)
    pub cache_ttl_seconds: u64,
    /// Maximum number of cache entries (default: 10,000)
    pub cache_max_entries: usize,
    /// Path to SQLite database file (default: "todo_api.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    #[allow(dead_code)]
    pub sqlite_path: String,
    /// Redis connection URL (default: "redis://127.0.0.1:6379")
    /// Note: Only used when the `redis` feature is enabled.
    #[allow(dead_code)]
    pub redis_url: String,
    /// Writes that may wait for a worker (default: 32)
    pub write_queue_capacity: usize,
    /// Seconds a request waits for a free queue slot (default: 10)
    pub write_timeout_seconds: u64,
    /// Seconds SQLite waits on a locked database (default: 10)
    #[allow(dead_code)]
    pub db_busy_timeout_seconds: u64,
    /// Whether deletes match on ID alone or on ID and title (default: id)
    pub delete_match: DeleteMatch,
    /// Whether the in-memory mirror is kept (default: true)
    pub mirror_enabled: bool,
    /// Seconds before a request is answered with 408 (default: 30)
    pub request_timeout_seconds: u64,
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_TTL_SECONDS` - Cache TTL in seconds (default: 300)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10,000)
    /// - `SQLITE_PATH` - SQLite database path (default: "todo_api.db")
    /// - `REDIS_URL` - Redis connection URL (default: "redis://127.0.0.1:6379")
    /// - `WRITE_QUEUE_CAPACITY` - Write queue depth per entity (default: 32)
    /// - `WRITE_TIMEOUT_SECONDS` - Enqueue timeout (default: 10)
    /// - `DB_BUSY_TIMEOUT_SECONDS` - SQLite busy timeout (default: 10)
    /// - `DELETE_MATCH` - `id` or `id-and-title` (default: `id`)
    /// - `MIRROR_ENABLED` - `true` or `false` (default: `true`)
    /// - `REQUEST_TIMEOUT_SECONDS` - Per-request deadline (default: 30)
    ///
    /// Values that fail to parse fall back to their default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            cache_ttl_seconds: parse_or(lookup("CACHE_TTL_SECONDS"), 300),
            cache_max_entries: parse_or(lookup("CACHE_MAX_ENTRIES"), 10_000),
            sqlite_path: lookup("SQLITE_PATH").unwrap_or_else(|| "todo_api.db".to_string()),
            redis_url: lookup("REDIS_URL")
                .unwrap_or_else(|| "redis://127.0.0.1:6379".to_string()),
            write_queue_capacity: parse_or(lookup("WRITE_QUEUE_CAPACITY"), 32),
            write_timeout_seconds: parse_or(lookup("WRITE_TIMEOUT_SECONDS"), 10),
            db_busy_timeout_seconds: parse_or(lookup("DB_BUSY_TIMEOUT_SECONDS"), 10),
            delete_match: parse_or(lookup("DELETE_MATCH"), DeleteMatch::default()),
            mirror_enabled: parse_or(lookup("MIRROR_ENABLED"), true),
            request_timeout_seconds: parse_or(lookup("REQUEST_TIMEOUT_SECONDS"), 30),
        }
    }

    /// Configuration with every default applied, ignoring the environment.
    #[cfg(test)]
    pub fn defaults() -> Self {
        Self::from_lookup(|_| None)
    }

    /// Get cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    /// Get the SQLite busy timeout as a Duration.
    #[allow(dead_code)]
    pub fn db_busy_timeout(&self) -> Duration {
        Duration::from_secs(self.db_busy_timeout_seconds)
    }

    /// Get the per-request deadline as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Settings for both write workers.
    pub fn writer(&self) -> WriterConfig {
        WriterConfig {
            capacity: self.write_queue_capacity,
            submit_timeout: Duration::from_secs(self.write_timeout_seconds),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
