//! Test utilities and fixtures for Waymark tests.
//!
//! Provides:
//! - Temporary database fixtures
//! - Manager construction over a fresh SQLite backend

use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use waymark::manager::WarpManager;
use waymark::storage::schema::ensure_schema;
use waymark::storage::sqlite::SqliteBackend;
use waymark::storage::WarpStore;

/// Test fixture that manages a temporary database directory.
///
/// The directory is automatically cleaned up when the fixture is dropped.
pub struct TestFixture {
    /// Temporary directory for test database
    pub temp_dir: TempDir,
    /// Path to the database file
    pub db_path: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture with a temporary database directory.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        Self { temp_dir, db_path }
    }

    /// Open a pooled SQLite backend on the fixture database.
    pub fn backend(&self) -> SqliteBackend {
        SqliteBackend::open(&self.db_path, 4).expect("failed to open backend")
    }

    /// Build a manager over a freshly initialized fixture database.
    pub fn manager(&self) -> WarpManager {
        let backend = self.backend();
        ensure_schema(&backend).expect("schema init failed");
        WarpManager::new(WarpStore::new(Arc::new(backend)))
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.temp_dir.path().exists());
    }
}
