use crate::core::normalize_query;

/// Default number of recent searches kept
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Bounded, most-recent-first list of past queries.
///
/// Two queries are the same entry when their normalized forms match; the
/// stored text is the trimmed query as the user typed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentSearchLog {
    entries: Vec<String>,
    limit: usize,
}

impl RecentSearchLog {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::with_capacity(limit),
            limit,
        }
    }

    /// Rebuild a log from persisted entries (most recent first).
    ///
    /// Blank entries and duplicates are dropped and the result is cut to
    /// `limit`.
    pub fn from_entries(entries: Vec<String>, limit: usize) -> Self {
        let mut log = Self::new(limit);
        for entry in entries.iter().rev() {
            log.record(entry);
        }
        log
    }

    /// Move `raw_query` to the front. Returns false for blank input.
    pub fn record(&mut self, raw_query: &str) -> bool {
        let trimmed = raw_query.trim();
        let normalized = normalize_query(trimmed);
        if normalized.is_empty() {
            return false;
        }

        self.entries.retain(|e| normalize_query(e) != normalized);
        self.entries.insert(0, trimmed.to_string());
        self.entries.truncate(self.limit);
        true
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for RecentSearchLog {
    fn default() -> Self {
        Self::new(DEFAULT_RECENT_LIMIT)
    }
}
