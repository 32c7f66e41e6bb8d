//! The cache boundary used to memoize realm lookups.

use std::hash::Hash;

use dashmap::DashMap;

/// Key-value cache. Implementations must be safe to share across tasks.
pub trait Cache<K, V>: Send + Sync {
    /// Cached value for `key`.
    fn get(&self, key: &K) -> Option<V>;

    /// Insert or replace.
    fn put(&self, key: K, value: V);

    /// Remove and return the cached value.
    fn remove(&self, key: &K) -> Option<V>;

    /// Drop every entry.
    fn clear(&self);

    /// Number of entries.
    fn len(&self) -> usize;

    /// Whether the cache holds nothing.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Unbounded in-process cache backed by a sharded concurrent map.
#[derive(Debug)]
pub struct MemoryCache<K: Eq + Hash, V> {
    entries: DashMap<K, V>,
}

impl<K: Eq + Hash, V> MemoryCache<K, V> {
    /// Empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl<K: Eq + Hash, V> Default for MemoryCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Cache<K, V> for MemoryCache<K, V>
where
    K: Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    fn get(&self, key: &K) -> Option<V> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    fn put(&self, key: K, value: V) {
        self.entries.insert(key, value);
    }

    fn remove(&self, key: &K) -> Option<V> {
        self.entries.remove(key).map(|(_, v)| v)
    }

    fn clear(&self) {
        self.entries.clear();
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
