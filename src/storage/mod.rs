//! Durable storage layer for Waymark.
//!
//! Provides:
//! - Engine abstraction over parameterized execute/query
//! - Embedded SQLite engine (pooled, WAL)
//! - Client/server PostgreSQL engine (feature `postgres`)
//! - Idempotent schema initialization
//! - CRUD statements for the warps table

pub mod backend;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod schema;
pub mod sqlite;
pub mod store;

pub use backend::{Backend, Row, StorageError, Value};
pub use store::WarpStore;
