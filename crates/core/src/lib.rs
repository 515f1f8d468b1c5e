//! Domain types, validation, and storage/cache contracts for `todo_api`.
//!
//! Everything here is free of I/O. Concrete stores, cache backends, and the
//! write worker live in the server crate.

pub mod cache;
pub mod storage;
pub mod todo;
