//! In-memory storage backend.
//!
//! This module provides an in-memory implementation of the repository traits
//! that stores all data in BTreeMaps wrapped in `Arc<RwLock<_>>`. It backs the
//! `inmemory` feature and the HTTP tests, where persistence is not required.

mod repository;

pub use repository::InMemoryRepository;
