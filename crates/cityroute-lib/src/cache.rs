use std::num::NonZeroUsize;

use lru::LruCache;

use crate::graph::NodeId;
use crate::path::SearchResult;
use crate::router::RouteStrategy;

/// Default number of routes kept by a router.
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// Cache key: directional endpoints plus the requested strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteKey {
    pub source: NodeId,
    pub destination: NodeId,
    pub strategy: RouteStrategy,
}

impl RouteKey {
    pub fn new(source: NodeId, destination: NodeId, strategy: RouteStrategy) -> Self {
        Self {
            source,
            destination,
            strategy,
        }
    }
}

/// Fixed-capacity least-recently-used store of route results.
///
/// Both lookups and inserts count as a use.
#[derive(Debug)]
pub struct RouteCache {
    entries: LruCache<RouteKey, SearchResult>,
}

impl RouteCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: LruCache::new(capacity),
        }
    }

    /// Look up a route, marking it most recently used on a hit.
    pub fn get(&mut self, key: &RouteKey) -> Option<&SearchResult> {
        self.entries.get(key)
    }

    /// Store a route as most recently used. Returns the key evicted to make
    /// room, if any.
    pub fn insert(&mut self, key: RouteKey, result: SearchResult) -> Option<RouteKey> {
        match self.entries.push(key, result) {
            Some((evicted, _)) if evicted != key => Some(evicted),
            _ => None,
        }
    }

    /// Membership test that leaves recency untouched.
    pub fn contains(&self, key: &RouteKey) -> bool {
        self.entries.contains(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for RouteCache {
    fn default() -> Self {
        Self::new(NonZeroUsize::new(DEFAULT_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::path::Algorithm;

    fn key(destination: NodeId) -> RouteKey {
        RouteKey::new(0, destination, RouteStrategy::Balanced)
    }

    fn result() -> SearchResult {
        SearchResult::not_found(Algorithm::Dijkstra, 0, Instant::now())
    }

    fn cache(capacity: usize) -> RouteCache {
        RouteCache::new(NonZeroUsize::new(capacity).unwrap())
    }

    #[test]
    fn overflow_evicts_least_recently_inserted() {
        let mut cache = cache(3);
        for destination in 1..=3 {
            assert_eq!(cache.insert(key(destination), result()), None);
        }
        assert_eq!(cache.insert(key(4), result()), Some(key(1)));
        assert_eq!(cache.len(), 3);
        assert!(!cache.contains(&key(1)));
    }

    #[test]
    fn lookup_refreshes_recency() {
        let mut cache = cache(3);
        for destination in 1..=3 {
            cache.insert(key(destination), result());
        }
        assert!(cache.get(&key(1)).is_some());
        assert_eq!(cache.insert(key(4), result()), Some(key(2)));
        assert!(cache.contains(&key(1)));
    }

    #[test]
    fn reinserting_a_key_does_not_evict() {
        let mut cache = cache(2);
        cache.insert(key(1), result());
        cache.insert(key(2), result());
        assert_eq!(cache.insert(key(1), result()), None);
        assert_eq!(cache.insert(key(3), result()), Some(key(2)));
    }

    #[test]
    fn strategy_is_part_of_the_key() {
        let mut cache = cache(4);
        cache.insert(RouteKey::new(1, 2, RouteStrategy::Fastest), result());
        assert!(!cache.contains(&RouteKey::new(1, 2, RouteStrategy::Shortest)));
        assert!(!cache.contains(&RouteKey::new(2, 1, RouteStrategy::Fastest)));
    }

    #[test]
    fn clear_empties_the_cache() {
        let mut cache = RouteCache::default();
        assert_eq!(cache.capacity(), DEFAULT_CACHE_CAPACITY);
        cache.insert(key(1), result());
        cache.clear();
        assert!(cache.is_empty());
    }
}
