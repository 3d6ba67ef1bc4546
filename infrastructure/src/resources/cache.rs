//! Shared in-process resource cache.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Filename-keyed cache shared by concurrent invocations.
///
/// Readers share the lock; population and eviction serialize. Two
/// concurrent first loads of the same key both read the same file, so the
/// last writer winning is harmless. Entries never expire on their own.
#[derive(Debug)]
pub struct ResourceCache<V> {
    entries: RwLock<HashMap<String, V>>,
}

impl<V> Default for ResourceCache<V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<V: Clone> ResourceCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<V> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn insert(&self, key: impl Into<String>, value: V) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value);
    }

    /// Evict one entry. Returns whether it was present.
    pub fn remove(&self, key: &str) -> bool {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .is_some()
    }

    /// Evict everything. Returns how many entries were dropped.
    pub fn clear(&self) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let count = entries.len();
        entries.clear();
        count
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
