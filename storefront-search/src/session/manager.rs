use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::recent::{DEFAULT_RECENT_LIMIT, RecentSearchLog};
use super::resolver::SearchResolver;
use crate::cache::{CacheStats, LfuCache};
use crate::core::{Result, normalize_query};
use crate::persistence::{SessionSnapshot, SnapshotStore, decode_snapshot, encode_snapshot};

/// Default number of cached queries
pub const DEFAULT_CACHE_CAPACITY: usize = 10;

/// Sizing for a search session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum cached queries; 0 disables caching
    pub capacity: usize,
    /// Maximum recent searches kept
    pub recent_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CACHE_CAPACITY,
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}

/// Cache and recent log, always mutated together under one lock
struct SessionState<T> {
    cache: LfuCache<Vec<T>>,
    recent: RecentSearchLog,
}

impl<T: Clone> SessionState<T> {
    fn snapshot(&self) -> SessionSnapshot<T> {
        SessionSnapshot {
            recent: self.recent.entries().to_vec(),
            cache: self.cache.serialize(),
        }
    }
}

/// Search session manager
///
/// Owns the result cache and the recent-search log. Both are guarded by a
/// single mutex that is never held while the resolver runs, so overlapping
/// searches each apply only their own query's results. Every mutation is
/// written to the attached store before the lock is released.
pub struct SearchSession<R: SearchResolver> {
    state: Mutex<SessionState<R::Record>>,
    resolver: R,
    store: Arc<dyn SnapshotStore>,
}

impl<R: SearchResolver> SearchSession<R> {
    /// Create an empty session
    pub fn new(config: SessionConfig, resolver: R, store: Arc<dyn SnapshotStore>) -> Self {
        Self::from_snapshot(SessionSnapshot::default(), config, resolver, store)
    }

    /// Create a session whose state is rebuilt from `snapshot`
    pub fn from_snapshot(
        snapshot: SessionSnapshot<R::Record>,
        config: SessionConfig,
        resolver: R,
        store: Arc<dyn SnapshotStore>,
    ) -> Self {
        let state = SessionState {
            cache: LfuCache::restore(snapshot.cache, config.capacity),
            recent: RecentSearchLog::from_entries(snapshot.recent, config.recent_limit),
        };

        Self {
            state: Mutex::new(state),
            resolver,
            store,
        }
    }

    /// Create a session from whatever `store` holds; empty if it holds nothing.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SearchError::PersistenceError`] if the store cannot be
    /// read or its payload cannot be decoded.
    pub fn open(config: SessionConfig, resolver: R, store: Arc<dyn SnapshotStore>) -> Result<Self> {
        let snapshot = match store.load()? {
            Some(payload) => decode_snapshot(&payload)?,
            None => SessionSnapshot::default(),
        };

        info!(
            "Restored search session: {} cached queries, {} recent searches (capacity: {})",
            snapshot.cache.len(),
            snapshot.recent.len(),
            config.capacity
        );

        Ok(Self::from_snapshot(snapshot, config, resolver, store))
    }

    /// Search for `raw_query`, serving from cache when possible.
    ///
    /// A blank query returns no results and changes nothing. On a hit the
    /// entry's frequency is bumped and the resolver is not called. On a miss
    /// the resolver runs without the state lock held; its results are cached
    /// (possibly evicting an entry) and returned.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SearchError::ResolverFailure`] when the resolver
    /// fails. Cache and recent log are left untouched in that case.
    pub async fn search(&self, raw_query: &str) -> Result<Vec<R::Record>> {
        let query = normalize_query(raw_query);
        if query.is_empty() {
            return Ok(Vec::new());
        }

        {
            let mut state = self.state.lock();
            if let Some(results) = state.cache.lookup(&query) {
                debug!(
                    "Cache HIT for \"{}\" (freq: {})",
                    query,
                    state.cache.frequency(&query).unwrap_or_default()
                );
                state.recent.record(raw_query);
                self.persist(&state);
                return Ok(results);
            }
        }

        debug!("Cache MISS for \"{}\" - resolving", query);
        let results = self.resolver.resolve(&query).await?;

        let mut state = self.state.lock();
        if let Some(evicted) = state.cache.insert(&query, results.clone()) {
            debug!("Evicted \"{}\" to cache \"{}\"", evicted, query);
        }
        state.recent.record(raw_query);
        self.persist(&state);

        Ok(results)
    }

    /// Recent searches, most recent first
    pub fn recent_searches(&self) -> Vec<String> {
        self.state.lock().recent.entries().to_vec()
    }

    /// Empty the recent-search log; cached results are kept
    pub fn clear_recent_searches(&self) {
        let mut state = self.state.lock();
        state.recent.clear();
        self.persist(&state);
    }

    /// Drop every cached result and recent search, and remove the stored state
    pub fn reset(&self) {
        let mut state = self.state.lock();
        let capacity = state.cache.capacity();
        state.cache = LfuCache::new(capacity);
        state.recent.clear();

        if let Err(e) = self.store.clear() {
            warn!("Failed to clear stored search state: {}", e);
        }
        info!("Search session reset (capacity: {})", capacity);
    }

    /// Full serializable state
    pub fn snapshot(&self) -> SessionSnapshot<R::Record> {
        self.state.lock().snapshot()
    }

    pub fn cache_stats(&self) -> CacheStats {
        *self.state.lock().cache.stats()
    }

    /// Frequency of a cached query, without counting as a use
    pub fn cache_frequency(&self, query: &str) -> Option<u64> {
        self.state.lock().cache.frequency(query)
    }

    /// Cached queries in insertion order
    pub fn cached_queries(&self) -> Vec<String> {
        self.state.lock().cache.keys()
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    fn persist(&self, state: &SessionState<R::Record>) {
        let result = encode_snapshot(&state.snapshot()).and_then(|payload| self.store.save(&payload));
        if let Err(e) = result {
            warn!("Failed to persist search state: {}", e);
        }
    }
}
