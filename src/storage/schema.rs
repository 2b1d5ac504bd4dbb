//! Schema initialization for the warps table.
//!
//! The DDL is dialect-neutral: the same statement text is accepted by both
//! SQLite and PostgreSQL. `IF NOT EXISTS` makes initialization idempotent.

use tracing::info;

use super::backend::{Backend, StorageError};

/// The warps table.
///
/// `hidden` is a string flag ("0" = public, "1" = hidden) so that rows
/// written before the column existed, or with out-of-range values, can
/// still be read with a public default.
const CREATE_WARPS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS warps (
    name     TEXT NOT NULL,
    world_id TEXT NOT NULL,
    x        INTEGER NOT NULL,
    y        INTEGER NOT NULL,
    hidden   TEXT NOT NULL DEFAULT '0',
    PRIMARY KEY (name, world_id)
)
"#;

/// Ensure the warps table exists.
///
/// Idempotent: calling this against an already-initialized database is a
/// no-op. Errors here are fatal to startup — the store cannot operate
/// without its backing table — and must be propagated, not swallowed.
pub fn ensure_schema(backend: &dyn Backend) -> Result<(), StorageError> {
    backend.execute(CREATE_WARPS_TABLE, &[])?;
    info!("Warps schema verified");
    Ok(())
}
