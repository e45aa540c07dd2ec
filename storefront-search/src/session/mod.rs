//! Search session: query policy over the result cache and recent log

pub mod manager;
pub mod recent;
pub mod resolver;

pub use manager::{DEFAULT_CACHE_CAPACITY, SearchSession, SessionConfig};
pub use recent::{DEFAULT_RECENT_LIMIT, RecentSearchLog};
pub use resolver::SearchResolver;
