//! Cache Module
//!
//! Search result caching:
//! - LFU: bounded store keyed by normalized query
//! - Snapshot: lossless serialized form used for persistence

pub mod lfu;
pub mod snapshot;

pub use lfu::LfuCache;
pub use snapshot::{CacheEntry, CacheSnapshot};

use serde::Serialize;

/// Counters for one cache instance.
///
/// Not persisted; a restored cache starts from zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// New keys stored
    pub inserts: u64,
    /// Existing keys overwritten
    pub updates: u64,
    pub evictions: u64,
}

impl CacheStats {
    pub(crate) fn count_lookup(&mut self, hit: bool) {
        if hit {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
    }

    pub(crate) fn count_store(&mut self, overwrite: bool) {
        if overwrite {
            self.updates += 1;
        } else {
            self.inserts += 1;
        }
    }

    pub(crate) fn count_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    /// Share of lookups served from cache; 0.0 before the first lookup
    pub fn hit_rate(&self) -> f64 {
        match self.lookups() {
            0 => 0.0,
            total => self.hits as f64 / total as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate_before_any_lookup() {
        let stats = CacheStats::default();
        assert_eq!(stats.lookups(), 0);
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_lookup_and_store_counters() {
        let mut stats = CacheStats::default();
        for hit in [true, true, true, false] {
            stats.count_lookup(hit);
        }
        stats.count_store(false);
        stats.count_store(true);
        stats.count_eviction();

        assert_eq!(stats.hits, 3);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.inserts, 1);
        assert_eq!(stats.updates, 1);
        assert_eq!(stats.evictions, 1);
        assert!((stats.hit_rate() - 0.75).abs() < f64::EPSILON);
    }
}
