//! Storage backend implementations.
//!
//! This module provides concrete implementations of the repository traits
//! defined in `todo_api_core::storage`, the write-behind workers that own
//! inserts, and the cached decorators that sit in front of both. The store
//! is selected at compile time via feature flags.
//!
//! # Feature Flags
//!
//! - `sqlite` (default): SQLite storage backend using `rusqlite` and `tokio-rusqlite`
//! - `inmemory`: process-local storage backed by ordered maps
//!
//! These features are mutually exclusive - only one storage backend can be
//! enabled at a time.
//!
//! # Examples
//!
//! Build with SQLite (default):
//! ```bash
//! cargo build -p todo_api
//! ```
//!
//! Build with the in-memory store:
//! ```bash
//! cargo build -p todo_api --no-default-features --features inmemory,memory
//! ```

// Compile-time checks for mutual exclusivity
#[cfg(all(feature = "sqlite", feature = "inmemory"))]
compile_error!(
    "Features 'sqlite' and 'inmemory' are mutually exclusive. \
    Enable only one storage backend at a time."
);

#[cfg(not(any(feature = "sqlite", feature = "inmemory")))]
compile_error!(
    "No storage backend selected. Enable 'sqlite' or 'inmemory' feature. \
    Example: cargo build -p todo_api --features sqlite"
);

pub mod cached;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

// The in-memory store also backs the HTTP tests.
#[cfg(any(feature = "inmemory", test))]
pub mod inmemory;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;

#[cfg(any(feature = "inmemory", test))]
#[allow(unused_imports)]
pub use inmemory::InMemoryRepository;
