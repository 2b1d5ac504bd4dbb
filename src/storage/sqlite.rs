//! Embedded SQLite storage engine.
//!
//! Uses r2d2 with r2d2_sqlite for pooled access. WAL mode allows
//! concurrent readers alongside the writer; `synchronous=FULL` keeps
//! confirmed writes durable across crashes.

use std::path::Path;
use std::time::Duration;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use super::backend::{Backend, Row, StorageError, Value};

/// SQLite implementation of [`Backend`].
#[derive(Clone)]
pub struct SqliteBackend {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteBackend {
    /// Open (creating if necessary) the database at `db_path`.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the SQLite database file
    /// * `pool_size` - Maximum number of pooled connections
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be created.
    pub fn open<P: AsRef<Path>>(db_path: P, pool_size: u32) -> Result<Self, StorageError> {
        let manager = SqliteConnectionManager::file(db_path);

        let pool = Pool::builder()
            .max_size(pool_size)
            .connection_customizer(Box::new(PragmaCustomizer))
            .build(manager)?;

        Ok(Self { pool })
    }
}

impl Backend for SqliteBackend {
    fn execute(&self, sql: &str, params: &[Value]) -> Result<usize, StorageError> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(sql).map_err(db_err)?;
        stmt.execute(rusqlite::params_from_iter(to_sql_values(params)))
            .map_err(db_err)
    }

    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, StorageError> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(sql).map_err(db_err)?;
        let column_count = stmt.column_count();

        let rows = stmt
            .query_map(rusqlite::params_from_iter(to_sql_values(params)), |row| {
                let mut values = Vec::with_capacity(column_count);
                for idx in 0..column_count {
                    values.push(match row.get::<_, rusqlite::types::Value>(idx)? {
                        rusqlite::types::Value::Integer(v) => Value::Int(v),
                        rusqlite::types::Value::Text(s) => Value::Text(s),
                        _ => Value::Null,
                    });
                }
                Ok(Row(values))
            })
            .map_err(db_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_err)?;

        Ok(rows)
    }
}

fn db_err(err: rusqlite::Error) -> StorageError {
    StorageError::Database(err.to_string())
}

fn to_sql_values(params: &[Value]) -> Vec<rusqlite::types::Value> {
    params
        .iter()
        .map(|p| match p {
            Value::Int(v) => rusqlite::types::Value::Integer(*v),
            Value::Text(s) => rusqlite::types::Value::Text(s.clone()),
            Value::Null => rusqlite::types::Value::Null,
        })
        .collect()
}

/// Apply connection pragmas.
fn apply_pragmas(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "FULL")?;
    conn.busy_timeout(Duration::from_secs(5))?;
    Ok(())
}

/// Connection customizer that applies pragmas on acquire.
#[derive(Debug)]
struct PragmaCustomizer;

impl r2d2::CustomizeConnection<rusqlite::Connection, rusqlite::Error> for PragmaCustomizer {
    fn on_acquire(&self, conn: &mut rusqlite::Connection) -> Result<(), rusqlite::Error> {
        apply_pragmas(conn)
    }
}
