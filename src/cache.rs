//! In-memory mirror of the warp store.
//!
//! The cache is a derived, rebuildable projection of the durable store:
//! keyed access is O(1), listing is a linear materialization, iteration
//! order is unspecified. It is only ever mutated as the direct result of
//! a confirmed store write, or wholesale via [`WarpCache::replace_world`].

use std::collections::HashMap;

use crate::warp::Warp;

/// Key identifying a unique warp: names are scoped per world.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct WarpKey {
    pub name: String,
    pub world_id: String,
}

impl WarpKey {
    pub fn new(name: impl Into<String>, world_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            world_id: world_id.into(),
        }
    }
}

/// Keyed collection of the warps this process has confirmed against the
/// store. Not guaranteed consistent with writes made by other processes.
#[derive(Debug, Default)]
pub struct WarpCache {
    entries: HashMap<WarpKey, Warp>,
}

impl WarpCache {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Insert or replace an entry, returning any displaced warp.
    pub fn upsert(&mut self, warp: Warp) -> Option<Warp> {
        let key = WarpKey::new(warp.name.clone(), warp.world_id.clone());
        self.entries.insert(key, warp)
    }

    /// Remove an entry, returning it if present.
    pub fn remove(&mut self, key: &WarpKey) -> Option<Warp> {
        self.entries.remove(key)
    }

    /// Mutate an entry in place.
    ///
    /// Returns false if no entry exists for `key`; the mutator is not run.
    pub fn update<F>(&mut self, key: &WarpKey, mutate: F) -> bool
    where
        F: FnOnce(&mut Warp),
    {
        match self.entries.get_mut(key) {
            Some(warp) => {
                mutate(warp);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, key: &WarpKey) -> Option<&Warp> {
        self.entries.get(key)
    }

    /// Materialize all cached warps belonging to one world.
    pub fn warps_in_world(&self, world_id: &str) -> Vec<Warp> {
        self.entries
            .values()
            .filter(|w| w.world_id == world_id)
            .cloned()
            .collect()
    }

    /// Replace the cached view of one world with freshly loaded entries.
    ///
    /// Entries for other worlds are untouched.
    pub fn replace_world(&mut self, world_id: &str, warps: Vec<Warp>) {
        self.entries.retain(|key, _| key.world_id != world_id);
        for warp in warps {
            self.upsert(warp);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_and_get() {
        let mut cache = WarpCache::new();
        assert!(cache.is_empty());

        cache.upsert(Warp::new("spawn", "world-1", 1, 2));
        let warp = cache.get(&WarpKey::new("spawn", "world-1")).unwrap();
        assert_eq!((warp.x, warp.y), (1, 2));

        // Same name in another world is a distinct entry
        cache.upsert(Warp::new("spawn", "world-2", 9, 9));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_update_in_place() {
        let mut cache = WarpCache::new();
        cache.upsert(Warp::new("spawn", "world-1", 0, 0));

        let key = WarpKey::new("spawn", "world-1");
        assert!(cache.update(&key, |w| {
            w.x = 7;
            w.y = -3;
        }));
        let warp = cache.get(&key).unwrap();
        assert_eq!((warp.x, warp.y), (7, -3));

        assert!(!cache.update(&WarpKey::new("ghost", "world-1"), |w| w.x = 1));
    }

    #[test]
    fn test_remove() {
        let mut cache = WarpCache::new();
        cache.upsert(Warp::new("spawn", "world-1", 0, 0));

        let key = WarpKey::new("spawn", "world-1");
        assert!(cache.remove(&key).is_some());
        assert!(cache.remove(&key).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_replace_world_leaves_other_worlds_alone() {
        let mut cache = WarpCache::new();
        cache.upsert(Warp::new("a", "world-1", 0, 0));
        cache.upsert(Warp::new("b", "world-1", 0, 0));
        cache.upsert(Warp::new("keep", "world-2", 0, 0));

        cache.replace_world("world-1", vec![Warp::new("c", "world-1", 5, 5)]);

        assert_eq!(cache.warps_in_world("world-1").len(), 1);
        assert!(cache.get(&WarpKey::new("c", "world-1")).is_some());
        assert!(cache.get(&WarpKey::new("keep", "world-2")).is_some());
    }
}
