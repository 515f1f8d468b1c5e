//! Redis cache backend implementation.
//!
//! Provides a distributed cache using Redis for multi-instance deployments.
//! Supports connection pooling, TTL, and namespace-scoped flushing.

mod cache;
mod error;

pub use cache::RedisCache;
