//! Client/server PostgreSQL storage engine.
//!
//! Enabled with the `postgres` cargo feature. Statement text is shared
//! with the SQLite engine; only the placeholder syntax differs, so `?`
//! placeholders are rewritten to `$1..$n` before execution.

use postgres::types::{ToSql, Type};
use postgres::NoTls;
use r2d2::Pool;
use r2d2_postgres::PostgresConnectionManager;

use super::backend::{Backend, Row, StorageError, Value};

/// PostgreSQL implementation of [`Backend`].
#[derive(Clone)]
pub struct PostgresBackend {
    pool: Pool<PostgresConnectionManager<NoTls>>,
}

impl PostgresBackend {
    /// Connect to the server described by a `postgres://` URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL does not parse or the pool cannot be
    /// created.
    pub fn connect(url: &str, pool_size: u32) -> Result<Self, StorageError> {
        let config: postgres::Config = url
            .parse()
            .map_err(|e: postgres::Error| StorageError::Database(e.to_string()))?;
        let manager = PostgresConnectionManager::new(config, NoTls);
        let pool = Pool::builder().max_size(pool_size).build(manager)?;
        Ok(Self { pool })
    }
}

impl Backend for PostgresBackend {
    fn execute(&self, sql: &str, params: &[Value]) -> Result<usize, StorageError> {
        let mut conn = self.pool.get()?;
        let sql = numbered_placeholders(sql);
        let owned = to_sql_params(params);
        let refs: Vec<&(dyn ToSql + Sync)> = owned.iter().map(|p| p.as_ref()).collect();
        let affected = conn.execute(sql.as_str(), &refs).map_err(db_err)?;
        Ok(affected as usize)
    }

    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, StorageError> {
        let mut conn = self.pool.get()?;
        let sql = numbered_placeholders(sql);
        let owned = to_sql_params(params);
        let refs: Vec<&(dyn ToSql + Sync)> = owned.iter().map(|p| p.as_ref()).collect();
        let rows = conn.query(sql.as_str(), &refs).map_err(db_err)?;
        Ok(rows.iter().map(convert_row).collect())
    }
}

fn db_err(err: postgres::Error) -> StorageError {
    StorageError::Database(err.to_string())
}

/// Rewrite `?` placeholders as `$1..$n`.
///
/// Statement text in this crate never carries a literal `?`, so a plain
/// character scan is sufficient.
fn numbered_placeholders(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len() + 8);
    let mut n = 0u32;
    for ch in sql.chars() {
        if ch == '?' {
            n += 1;
            out.push('$');
            out.push_str(&n.to_string());
        } else {
            out.push(ch);
        }
    }
    out
}

fn to_sql_params(params: &[Value]) -> Vec<Box<dyn ToSql + Sync>> {
    params
        .iter()
        .map(|p| match p {
            // Coordinates are INT4 in the schema; anything wider binds as INT8
            Value::Int(v) => match i32::try_from(*v) {
                Ok(v) => Box::new(v) as Box<dyn ToSql + Sync>,
                Err(_) => Box::new(*v),
            },
            Value::Text(s) => Box::new(s.clone()),
            Value::Null => Box::new(Option::<String>::None),
        })
        .collect()
}

fn convert_row(row: &postgres::Row) -> Row {
    let mut values = Vec::with_capacity(row.len());
    for (idx, column) in row.columns().iter().enumerate() {
        let ty = column.type_();
        let value = if *ty == Type::INT2 {
            row.try_get::<_, Option<i16>>(idx)
                .ok()
                .flatten()
                .map(|v| Value::Int(i64::from(v)))
        } else if *ty == Type::INT4 {
            row.try_get::<_, Option<i32>>(idx)
                .ok()
                .flatten()
                .map(|v| Value::Int(i64::from(v)))
        } else if *ty == Type::INT8 {
            row.try_get::<_, Option<i64>>(idx).ok().flatten().map(Value::Int)
        } else if *ty == Type::TEXT || *ty == Type::VARCHAR || *ty == Type::BPCHAR {
            row.try_get::<_, Option<String>>(idx)
                .ok()
                .flatten()
                .map(Value::Text)
        } else {
            None
        };
        values.push(value.unwrap_or(Value::Null));
    }
    Row(values)
}
