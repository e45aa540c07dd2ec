pub mod cache;
pub mod catalog;
pub mod config;
pub mod core;
pub mod persistence;
pub mod session;

// Re-export commonly used types
pub use cache::{CacheEntry, CacheSnapshot, CacheStats, LfuCache};
pub use catalog::CatalogResolver;
pub use config::StorefrontConfig;
pub use core::{Product, ResolverError, SearchError, normalize_query};
pub use persistence::{FileStore, MemoryStore, PersistenceError, SessionSnapshot, SnapshotStore};
pub use session::{RecentSearchLog, SearchResolver, SearchSession, SessionConfig};
