//! LFU (Least Frequently Used) Cache Implementation
//!
//! Keys are normalized query strings. Eviction scans every live entry for
//! the lowest frequency, which is O(n) in the number of entries; the cache
//! holds tens of entries, so no frequency-bucket index is kept. Frequency
//! ties are broken by insertion order: the oldest entry goes first.

use std::collections::HashMap;
use tracing::debug;

use super::CacheStats;
use super::snapshot::{CacheEntry, CacheSnapshot};
use crate::core::normalize_query;

/// Entry in LFU cache with frequency counter
struct LfuEntry<V> {
    value: V,
    frequency: u64,
    /// Insertion sequence number, breaks frequency ties
    seq: u64,
}

/// LFU Cache - evicts least frequently used items
pub struct LfuCache<V> {
    capacity: usize,
    cache: HashMap<String, LfuEntry<V>>,
    next_seq: u64,
    stats: CacheStats,
}

impl<V: Clone> LfuCache<V> {
    /// Create an empty cache. A capacity of 0 stores nothing.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            cache: HashMap::with_capacity(capacity),
            next_seq: 0,
            stats: CacheStats::default(),
        }
    }

    /// Look up a query. A hit bumps the entry's frequency.
    pub fn lookup(&mut self, key: &str) -> Option<V> {
        let key = normalize_query(key);
        match self.cache.get_mut(&key) {
            Some(entry) => {
                entry.frequency = entry.frequency.saturating_add(1);
                self.stats.count_lookup(true);
                Some(entry.value.clone())
            }
            None => {
                self.stats.count_lookup(false);
                None
            }
        }
    }

    /// Insert or overwrite a query's value.
    ///
    /// Overwriting counts as a use and bumps the frequency. Inserting a new
    /// key into a full cache evicts the least frequently used entry first;
    /// its key is returned.
    pub fn insert(&mut self, key: &str, value: V) -> Option<String> {
        if self.capacity == 0 {
            return None;
        }

        let key = normalize_query(key);

        if let Some(entry) = self.cache.get_mut(&key) {
            entry.value = value;
            entry.frequency = entry.frequency.saturating_add(1);
            self.stats.count_store(true);
            return None;
        }

        let evicted = if self.cache.len() >= self.capacity {
            self.evict_lfu()
        } else {
            None
        };

        let seq = self.next_seq;
        self.next_seq += 1;
        self.cache.insert(
            key,
            LfuEntry {
                value,
                frequency: 1,
                seq,
            },
        );
        self.stats.count_store(false);

        evicted
    }

    fn evict_lfu(&mut self) -> Option<String> {
        // Find key with minimum (frequency, insertion order)
        let evict_key = self
            .cache
            .iter()
            .min_by_key(|(_, entry)| (entry.frequency, entry.seq))
            .map(|(key, _)| key.clone())?;

        let evicted = self.cache.remove(&evict_key)?;
        self.stats.count_eviction();
        debug!("LFU evict: {} (freq: {})", evict_key, evicted.frequency);

        Some(evict_key)
    }

    /// Full snapshot of every entry, oldest insertion first.
    pub fn serialize(&self) -> CacheSnapshot<V> {
        let mut live: Vec<(&String, &LfuEntry<V>)> = self.cache.iter().collect();
        live.sort_by_key(|(_, entry)| entry.seq);

        CacheSnapshot::from_entries(
            live.into_iter()
                .map(|(key, entry)| CacheEntry {
                    key: key.clone(),
                    value: entry.value.clone(),
                    freq: entry.frequency,
                })
                .collect(),
        )
    }

    /// Rebuild a cache from a snapshot by assigning stored state directly.
    ///
    /// Entries keep their snapshot order as insertion order. Stored
    /// frequencies below 1 are raised to 1. When the snapshot holds more
    /// entries than `capacity`, the least frequently used are dropped.
    pub fn restore(snapshot: CacheSnapshot<V>, capacity: usize) -> Self {
        let mut lfu = Self::new(capacity);
        if capacity == 0 {
            return lfu;
        }

        for entry in snapshot.into_entries() {
            let key = normalize_query(&entry.key);
            let frequency = entry.freq.max(1);

            if let Some(existing) = lfu.cache.get_mut(&key) {
                existing.value = entry.value;
                existing.frequency = frequency;
                continue;
            }

            let seq = lfu.next_seq;
            lfu.next_seq += 1;
            lfu.cache.insert(
                key,
                LfuEntry {
                    value: entry.value,
                    frequency,
                    seq,
                },
            );
        }

        while lfu.cache.len() > capacity {
            if lfu.evict_lfu().is_none() {
                break;
            }
        }

        lfu.stats = CacheStats::default();
        lfu
    }
}

impl<V> LfuCache<V> {
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Presence check without touching the frequency
    pub fn contains(&self, key: &str) -> bool {
        self.cache.contains_key(&normalize_query(key))
    }

    /// Current frequency without touching it
    pub fn frequency(&self, key: &str) -> Option<u64> {
        self.cache
            .get(&normalize_query(key))
            .map(|entry| entry.frequency)
    }

    /// Keys in insertion order
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<(&String, u64)> = self
            .cache
            .iter()
            .map(|(key, entry)| (key, entry.seq))
            .collect();
        keys.sort_by_key(|(_, seq)| *seq);
        keys.into_iter().map(|(key, _)| key.clone()).collect()
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lfu_basic() {
        let mut cache = LfuCache::new(3);

        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("c", 3);

        assert_eq!(cache.lookup("a"), Some(1)); // freq=2
        assert_eq!(cache.lookup("a"), Some(1)); // freq=3
        assert_eq!(cache.lookup("b"), Some(2)); // freq=2

        // Insert d, should evict c (freq=1, least frequent)
        assert_eq!(cache.insert("d", 4), Some("c".to_string()));

        assert_eq!(cache.lookup("c"), None);
        assert_eq!(cache.lookup("a"), Some(1)); // freq=4, most frequent
        assert_eq!(cache.lookup("d"), Some(4));
    }

    #[test]
    fn test_eviction_scenario() {
        let mut cache = LfuCache::new(2);
        cache.insert("a", "A");
        cache.insert("b", "B");
        cache.lookup("a");

        let evicted = cache.insert("c", "C");

        assert_eq!(evicted.as_deref(), Some("b"));
        assert_eq!(cache.keys(), vec!["a".to_string(), "c".to_string()]);
        assert_eq!(cache.frequency("a"), Some(2));
        assert_eq!(cache.frequency("c"), Some(1));
    }

    #[test]
    fn test_tie_break_evicts_oldest_insertion() {
        let mut cache = LfuCache::new(3);
        cache.insert("first", 1);
        cache.insert("second", 2);
        cache.insert("third", 3);

        assert_eq!(cache.insert("fourth", 4), Some("first".to_string()));
        assert_eq!(cache.insert("fifth", 5), Some("second".to_string()));
    }

    #[test]
    fn test_overwrite_keeps_insertion_order() {
        let mut cache = LfuCache::new(2);
        cache.insert("old", 1);
        cache.insert("new", 2);
        // old: freq 2, new: freq 1
        cache.insert("old", 10);
        cache.lookup("new"); // new: freq 2

        // Tie at freq 2, "old" was inserted first
        assert_eq!(cache.insert("third", 3), Some("old".to_string()));
    }

    #[test]
    fn test_overwrite_increments_frequency_and_replaces_value() {
        let mut cache = LfuCache::new(2);
        cache.insert("shoes", vec![1]);
        cache.lookup("shoes");
        cache.insert("shoes", vec![2, 3]);

        assert_eq!(cache.frequency("shoes"), Some(3));
        assert_eq!(cache.lookup("shoes"), Some(vec![2, 3]));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_normalization_equivalence() {
        let mut cache = LfuCache::new(4);
        cache.insert("phone", "X");

        assert_eq!(cache.lookup("Phone"), Some("X"));
        assert_eq!(cache.lookup("  PHONE "), Some("X"));
        assert_eq!(cache.frequency("phone"), Some(3));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let mut cache = LfuCache::new(0);
        assert_eq!(cache.insert("x", vec![1, 2]), None);
        assert_eq!(cache.lookup("x"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_lookup_missing_is_absent_not_error() {
        let mut cache: LfuCache<u32> = LfuCache::new(1);
        assert_eq!(cache.lookup("missing"), None);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_observers_do_not_bump_frequency() {
        let mut cache = LfuCache::new(2);
        cache.insert("a", 1);

        assert!(cache.contains("A"));
        assert_eq!(cache.frequency("a"), Some(1));
        assert_eq!(cache.frequency("a"), Some(1));
        assert_eq!(cache.frequency("b"), None);
    }

    #[test]
    fn test_capacity_invariant_under_many_inserts() {
        let mut cache = LfuCache::new(5);
        for i in 0..100 {
            cache.insert(&format!("q{}", i), i);
            if i % 3 == 0 {
                cache.lookup(&format!("q{}", i));
            }
            assert!(cache.len() <= 5);
        }
    }

    #[test]
    fn test_evicted_key_has_minimum_frequency() {
        let mut cache = LfuCache::new(4);
        for (key, hits) in [("a", 3), ("b", 0), ("c", 5), ("d", 1)] {
            cache.insert(key, ());
            for _ in 0..hits {
                cache.lookup(key);
            }
        }

        let min_before = ["a", "b", "c", "d"]
            .iter()
            .filter_map(|k| cache.frequency(k))
            .min()
            .unwrap();
        let evicted = cache.insert("e", ()).unwrap();

        assert_eq!(evicted, "b");
        assert_eq!(min_before, 1);
    }

    #[test]
    fn test_serialize_orders_by_insertion() {
        let mut cache = LfuCache::new(3);
        cache.insert("z", 1);
        cache.insert("a", 2);
        cache.insert("m", 3);
        cache.lookup("a");

        let snapshot = cache.serialize();
        let keys: Vec<&str> = snapshot.entries().iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
        assert_eq!(snapshot.get("a").map(|e| e.freq), Some(2));
    }

    #[test]
    fn test_restore_round_trip() {
        let mut cache = LfuCache::new(3);
        cache.insert("a", vec!["x".to_string()]);
        cache.insert("b", vec![]);
        cache.insert("c", vec!["y".to_string(), "z".to_string()]);
        cache.lookup("c");
        cache.lookup("c");
        cache.insert("a", vec!["w".to_string()]);

        let snapshot = cache.serialize();
        let restored = LfuCache::restore(snapshot.clone(), 3);

        assert_eq!(restored.serialize(), snapshot);
        assert_eq!(restored.frequency("c"), Some(3));
        assert_eq!(restored.frequency("a"), Some(2));
    }

    #[test]
    fn test_restore_full_cache_has_no_eviction_artifacts() {
        let mut cache = LfuCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        for _ in 0..4 {
            cache.lookup("b");
        }

        let restored = LfuCache::restore(cache.serialize(), 2);

        assert_eq!(restored.len(), 2);
        assert_eq!(restored.frequency("a"), Some(1));
        assert_eq!(restored.frequency("b"), Some(5));
        assert_eq!(restored.stats().evictions, 0);
    }

    #[test]
    fn test_restore_preserves_tie_break_order() {
        let mut cache = LfuCache::new(2);
        cache.insert("older", 1);
        cache.insert("newer", 2);

        let mut restored = LfuCache::restore(cache.serialize(), 2);
        assert_eq!(restored.insert("third", 3), Some("older".to_string()));
    }

    #[test]
    fn test_restore_into_smaller_capacity_drops_least_frequent() {
        let mut cache = LfuCache::new(3);
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("c", 3);
        cache.lookup("a");
        cache.lookup("c");

        let restored = LfuCache::restore(cache.serialize(), 2);

        assert_eq!(restored.len(), 2);
        assert!(!restored.contains("b"));
        assert!(restored.contains("a"));
        assert!(restored.contains("c"));
    }

    #[test]
    fn test_restore_normalizes_keys_and_clamps_frequency() {
        let snapshot = CacheSnapshot::from_entries(vec![CacheEntry {
            key: " Laptop ".to_string(),
            value: 7,
            freq: 0,
        }]);

        let mut restored = LfuCache::restore(snapshot, 4);

        assert_eq!(restored.frequency("laptop"), Some(1));
        assert_eq!(restored.lookup("LAPTOP"), Some(7));
    }

    #[test]
    fn test_restore_with_zero_capacity_is_empty() {
        let mut cache = LfuCache::new(2);
        cache.insert("a", 1);

        let restored = LfuCache::restore(cache.serialize(), 0);
        assert!(restored.is_empty());
    }

    #[test]
    fn test_stats_track_operations() {
        let mut cache = LfuCache::new(1);
        cache.insert("a", 1);
        cache.insert("a", 2);
        cache.lookup("a");
        cache.lookup("b");
        cache.insert("b", 3);

        let stats = cache.stats();
        assert_eq!(stats.inserts, 2);
        assert_eq!(stats.updates, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.evictions, 1);
        assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
    }
}
