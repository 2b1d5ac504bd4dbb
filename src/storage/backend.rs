//! Storage engine abstraction.
//!
//! All persistence goes through the [`Backend`] trait: a parameterized
//! write capability and a parameterized query capability. Concrete engines
//! (embedded SQLite, client/server PostgreSQL) implement it once and are
//! selected at configuration time, so callers never branch on the dialect.
//!
//! Statements are written with `?` placeholders and bound values; no
//! identifier or value is ever spliced into SQL text.

use thiserror::Error;

/// Error type for storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to get connection from pool: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("database error: {0}")]
    Database(String),
}

/// A value bound into a parameterized statement, or read back from a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Text(String),
    Null,
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }
}

/// A materialized result row, values in select-list order.
///
/// Columns whose stored value does not fit [`Value`] are surfaced as
/// [`Value::Null`]; it is the caller's contract that decides whether that
/// is tolerable (visibility flags) or malformed (coordinates).
#[derive(Debug, Clone)]
pub struct Row(pub Vec<Value>);

impl Row {
    /// Read column `idx` as an integer.
    pub fn get_i64(&self, idx: usize) -> Option<i64> {
        match self.0.get(idx) {
            Some(Value::Int(v)) => Some(*v),
            _ => None,
        }
    }

    /// Read column `idx` as text.
    pub fn get_str(&self, idx: usize) -> Option<&str> {
        match self.0.get(idx) {
            Some(Value::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// A storage engine capable of parameterized writes and queries.
///
/// Implementations must be usable from multiple threads; connection
/// pooling is an implementation concern.
pub trait Backend: Send + Sync {
    /// Execute a parameterized statement, returning the affected row count.
    fn execute(&self, sql: &str, params: &[Value]) -> Result<usize, StorageError>;

    /// Run a parameterized query, materializing all result rows.
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, StorageError>;
}
