use thiserror::Error;

use crate::persistence::PersistenceError;

/// Failure reported by a search resolver.
///
/// Resolver errors are carried to the caller verbatim; the session never
/// turns them into an empty result set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolverError {
    #[error("Search backend unavailable: {0}")]
    Unavailable(String),

    #[error("Search backend error: {0}")]
    Backend(String),
}

/// Main error type for search session operations
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Resolver failure: {0}")]
    ResolverFailure(#[from] ResolverError),

    #[error("Persistence error: {0}")]
    PersistenceError(#[from] PersistenceError),
}

/// Result type alias for search session operations
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolver_error_display() {
        let err = ResolverError::Unavailable("offline".to_string());
        assert_eq!(err.to_string(), "Search backend unavailable: offline");

        let err = ResolverError::Backend("500".to_string());
        assert_eq!(err.to_string(), "Search backend error: 500");
    }

    #[test]
    fn test_search_error_wraps_resolver_error_verbatim() {
        let err: SearchError = ResolverError::Backend("timeout".to_string()).into();
        assert_eq!(err.to_string(), "Resolver failure: Search backend error: timeout");
        assert!(matches!(
            err,
            SearchError::ResolverFailure(ResolverError::Backend(ref m)) if m == "timeout"
        ));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SearchError>();
        assert_send_sync::<ResolverError>();
    }
}
