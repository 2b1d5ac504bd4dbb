//! Waymark: a world-scoped named waypoint store.
//!
//! Waymark keeps uniquely-named "warps" per world in a durable SQL store
//! (embedded SQLite, or PostgreSQL with the `postgres` feature) and
//! mirrors them in an in-memory collection for fast lookup.
//!
//! # Architecture
//!
//! - **Write-then-mirror**: the durable store is always updated first;
//!   the cache only after the store confirms, with exactly the state the
//!   caller requested
//! - **World-scoped**: every operation takes an explicit `world_id`;
//!   name uniqueness is enforced per world by the store's primary key
//! - **Typed failures**: storage errors never panic across the manager
//!   boundary; not-found and store failure are distinct results
//!
//! # Modules
//!
//! - [`cache`]: In-memory mirror of store contents
//! - [`config`]: CLI and environment configuration
//! - [`manager`]: The facade composing store and cache
//! - [`observability`]: Logging setup
//! - [`storage`]: Durable storage engines, schema, and CRUD statements
//! - [`warp`]: The warp data model

// Lint configuration
#![warn(clippy::all)]
#![allow(
    clippy::module_name_repetitions, // cache::WarpCache is fine
    clippy::must_use_candidate,      // Not all functions need #[must_use]
    clippy::missing_errors_doc,      // Error docs can be verbose
    clippy::needless_raw_string_hashes // r#""# is fine for SQL
)]

pub mod cache;
pub mod config;
pub mod manager;
pub mod observability;
pub mod storage;
pub mod warp;

pub use cache::{WarpCache, WarpKey};
pub use manager::{WarpError, WarpManager};
pub use storage::{Backend, StorageError, WarpStore};
pub use warp::Warp;
