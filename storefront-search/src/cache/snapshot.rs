//! Serializable cache snapshot.
//!
//! On the wire a snapshot is a JSON object keyed by normalized query:
//! `{ "shoes": { "key": "shoes", "value": [...], "freq": 2 } }`. Entries are
//! written oldest insertion first and read back in document order, so the
//! eviction tie-break order survives a persist/restore cycle.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

/// One cached query with its value and usage count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<V> {
    /// Normalized query; the enclosing map key wins when they differ
    #[serde(default)]
    pub key: String,
    pub value: V,
    pub freq: u64,
}

/// Ordered snapshot of every live cache entry
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSnapshot<V> {
    entries: Vec<CacheEntry<V>>,
}

impl<V> Default for CacheSnapshot<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> CacheSnapshot<V> {
    pub fn from_entries(entries: Vec<CacheEntry<V>>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[CacheEntry<V>] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<CacheEntry<V>> {
        self.entries
    }

    pub fn get(&self, key: &str) -> Option<&CacheEntry<V>> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Serialize> Serialize for CacheSnapshot<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.key, entry)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for CacheSnapshot<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(SnapshotVisitor(PhantomData))
    }
}

struct SnapshotVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for SnapshotVisitor<V> {
    type Value = CacheSnapshot<V>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of query to cache entry")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0).min(256));

        while let Some((key, mut entry)) = access.next_entry::<String, CacheEntry<V>>()? {
            entry.key = key;
            entries.push(entry);
        }

        Ok(CacheSnapshot { entries })
    }
}
