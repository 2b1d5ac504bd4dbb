//! The warp manager facade.
//!
//! Composes the durable [`WarpStore`] with the in-memory [`WarpCache`]
//! under write-then-mirror ordering: the store is updated first, and the
//! cache only after the store confirms, with exactly the state the caller
//! requested. A coarse mutex around the mutation path keeps store write
//! and cache update mutually exclusive; reads never block each other.
//!
//! Storage failures never panic across this boundary: every operation
//! returns a typed result, and each failure is logged here exactly once.

use std::sync::Mutex;

use thiserror::Error;
use tracing::{debug, error, info};

use crate::cache::{WarpCache, WarpKey};
use crate::storage::{StorageError, WarpStore};
use crate::warp::Warp;

/// Error type for manager operations.
#[derive(Debug, Error)]
pub enum WarpError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The operation expected an existing warp and none matched.
    #[error("no warp named {name:?} in world {world_id:?}")]
    NotFound { name: String, world_id: String },
}

/// Facade over the durable store and its in-memory mirror.
///
/// All operations are synchronous and world-scoped; the caller's current
/// world is always passed explicitly. No retries are performed on
/// failure.
pub struct WarpManager {
    store: WarpStore,
    cache: Mutex<WarpCache>,
}

impl WarpManager {
    /// Create a manager with an empty cache.
    ///
    /// The cache stays empty until writes land or [`reload`](Self::reload)
    /// populates it from the store.
    pub fn new(store: WarpStore) -> Self {
        Self {
            store,
            cache: Mutex::new(WarpCache::new()),
        }
    }

    /// Create a new public warp.
    ///
    /// Uniqueness of `(name, world_id)` is enforced by the store's
    /// primary key; a duplicate surfaces as a storage error and leaves
    /// the cache untouched.
    pub fn add_warp(&self, x: i32, y: i32, name: &str, world_id: &str) -> Result<(), WarpError> {
        let mut cache = self.cache.lock().unwrap();
        if let Err(e) = self.store.insert(name, world_id, x, y) {
            error!(name, world_id, error = %e, "Failed to add warp");
            return Err(e.into());
        }
        cache.upsert(Warp::new(name, world_id, x, y));
        debug!(name, world_id, x, y, "Warp added");
        Ok(())
    }

    /// Delete a warp.
    ///
    /// Deleting a warp that does not exist is not an error; the store
    /// reports zero rows and the cache entry (if any) is still dropped.
    pub fn remove_warp(&self, name: &str, world_id: &str) -> Result<(), WarpError> {
        let mut cache = self.cache.lock().unwrap();
        let affected = match self.store.delete(name, world_id) {
            Ok(n) => n,
            Err(e) => {
                error!(name, world_id, error = %e, "Failed to remove warp");
                return Err(e.into());
            }
        };
        cache.remove(&WarpKey::new(name, world_id));
        debug!(name, world_id, affected, "Warp removed");
        Ok(())
    }

    /// Look up a warp by name within a world, straight from the store.
    ///
    /// Returns `Ok(None)` when absent; a storage failure is distinct and
    /// typed, not folded into the not-found case.
    pub fn find_warp(&self, name: &str, world_id: &str) -> Result<Option<Warp>, WarpError> {
        self.store.find(name, world_id).map_err(|e| {
            error!(name, world_id, error = %e, "Failed to find warp");
            e.into()
        })
    }

    /// Names of all public warps in a world, ordered by name.
    pub fn list_public_warps(&self, world_id: &str) -> Result<Vec<String>, WarpError> {
        self.store.list_public(world_id).map_err(|e| {
            error!(world_id, error = %e, "Failed to list warps");
            e.into()
        })
    }

    /// Move an existing warp.
    ///
    /// The warp must exist: zero affected rows is reported as
    /// [`WarpError::NotFound`] and the cache is left unchanged.
    pub fn position_warp(
        &self,
        name: &str,
        world_id: &str,
        x: i32,
        y: i32,
    ) -> Result<(), WarpError> {
        let mut cache = self.cache.lock().unwrap();
        let affected = match self.store.update_position(name, world_id, x, y) {
            Ok(n) => n,
            Err(e) => {
                error!(name, world_id, error = %e, "Failed to move warp");
                return Err(e.into());
            }
        };
        if affected == 0 {
            debug!(name, world_id, "Move skipped, no such warp");
            return Err(not_found(name, world_id));
        }
        cache.update(&WarpKey::new(name, world_id), |w| {
            w.x = x;
            w.y = y;
        });
        debug!(name, world_id, x, y, "Warp moved");
        Ok(())
    }

    /// Set a warp's visibility.
    ///
    /// Same existence policy as [`position_warp`](Self::position_warp).
    pub fn hide_warp(&self, name: &str, world_id: &str, hidden: bool) -> Result<(), WarpError> {
        let mut cache = self.cache.lock().unwrap();
        let affected = match self.store.update_visibility(name, world_id, hidden) {
            Ok(n) => n,
            Err(e) => {
                error!(name, world_id, error = %e, "Failed to update warp visibility");
                return Err(e.into());
            }
        };
        if affected == 0 {
            debug!(name, world_id, "Visibility update skipped, no such warp");
            return Err(not_found(name, world_id));
        }
        cache.update(&WarpKey::new(name, world_id), |w| w.hidden = hidden);
        debug!(name, world_id, hidden, "Warp visibility updated");
        Ok(())
    }

    /// Rebuild the cache's view of one world from the store.
    ///
    /// Returns the number of warps loaded. On failure the cached view of
    /// that world is left as it was.
    pub fn reload(&self, world_id: &str) -> Result<usize, WarpError> {
        let warps = match self.store.list_world(world_id) {
            Ok(w) => w,
            Err(e) => {
                error!(world_id, error = %e, "Failed to reload warps");
                return Err(e.into());
            }
        };
        let count = warps.len();
        self.cache.lock().unwrap().replace_world(world_id, warps);
        info!(world_id, count, "Warps reloaded");
        Ok(count)
    }

    /// Read a warp from the mirror without a store round trip.
    pub fn cached(&self, name: &str, world_id: &str) -> Option<Warp> {
        self.cache
            .lock()
            .unwrap()
            .get(&WarpKey::new(name, world_id))
            .cloned()
    }

    /// Materialize the mirrored warps of one world without a store
    /// round trip.
    pub fn cached_world(&self, world_id: &str) -> Vec<Warp> {
        self.cache.lock().unwrap().warps_in_world(world_id)
    }

    /// Number of warps currently mirrored, across all worlds.
    pub fn cached_count(&self) -> usize {
        self.cache.lock().unwrap().len()
    }
}

fn not_found(name: &str, world_id: &str) -> WarpError {
    WarpError::NotFound {
        name: name.to_owned(),
        world_id: world_id.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::schema::ensure_schema;
    use crate::storage::sqlite::SqliteBackend;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn open_test_manager() -> (TempDir, WarpManager) {
        let temp_dir = TempDir::new().unwrap();
        let backend = SqliteBackend::open(temp_dir.path().join("test.db"), 2).unwrap();
        ensure_schema(&backend).unwrap();
        let manager = WarpManager::new(WarpStore::new(Arc::new(backend)));
        (temp_dir, manager)
    }

    #[test]
    fn test_add_mirrors_requested_state() {
        let (_dir, manager) = open_test_manager();

        manager.add_warp(3, 4, "spawn", "world-1").unwrap();

        let cached = manager.cached("spawn", "world-1").expect("not mirrored");
        assert_eq!((cached.x, cached.y), (3, 4));
        assert!(!cached.hidden);
    }

    #[test]
    fn test_remove_drops_mirror_entry() {
        let (_dir, manager) = open_test_manager();

        manager.add_warp(0, 0, "spawn", "world-1").unwrap();
        manager.remove_warp("spawn", "world-1").unwrap();

        assert!(manager.cached("spawn", "world-1").is_none());
        assert_eq!(manager.cached_count(), 0);
    }

    #[test]
    fn test_position_and_hide_update_mirror_in_place() {
        let (_dir, manager) = open_test_manager();

        manager.add_warp(0, 0, "spawn", "world-1").unwrap();
        manager.position_warp("spawn", "world-1", 8, -2).unwrap();
        manager.hide_warp("spawn", "world-1", true).unwrap();

        let cached = manager.cached("spawn", "world-1").unwrap();
        assert_eq!((cached.x, cached.y), (8, -2));
        assert!(cached.hidden);
    }

    #[test]
    fn test_update_of_missing_warp_is_not_found() {
        let (_dir, manager) = open_test_manager();

        let err = manager.position_warp("ghost", "world-1", 5, 5).unwrap_err();
        assert!(matches!(err, WarpError::NotFound { .. }));
        let err = manager.hide_warp("ghost", "world-1", true).unwrap_err();
        assert!(matches!(err, WarpError::NotFound { .. }));
        assert_eq!(manager.cached_count(), 0);
    }

    #[test]
    fn test_reload_rebuilds_one_world() {
        let (dir, manager) = open_test_manager();

        manager.add_warp(1, 1, "a", "world-1").unwrap();
        manager.add_warp(2, 2, "b", "world-1").unwrap();
        manager.add_warp(3, 3, "c", "world-2").unwrap();

        // A fresh manager over the same store starts with an empty mirror
        let manager2 = WarpManager::new(WarpStore::new(Arc::new(
            SqliteBackend::open(dir.path().join("test.db"), 2).unwrap(),
        )));
        assert_eq!(manager2.cached_count(), 0);

        assert_eq!(manager2.reload("world-1").unwrap(), 2);
        assert_eq!(manager2.cached_count(), 2);
        assert_eq!(manager2.cached_world("world-1").len(), 2);
        assert!(manager2.cached("a", "world-1").is_some());
        assert!(manager2.cached("c", "world-2").is_none());
    }
}
