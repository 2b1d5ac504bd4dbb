//! Observability infrastructure.
//!
//! Provides structured logging setup via tracing-subscriber. Every
//! storage-layer failure in the crate is reported through this sink
//! exactly once, with full error detail.

pub mod tracing;
