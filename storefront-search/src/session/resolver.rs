use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::core::ResolverError;

/// Computes search results for a query the cache does not hold.
#[async_trait]
pub trait SearchResolver: Send + Sync {
    /// Result record type; opaque to the cache
    type Record: Clone + Send + Sync + Serialize + DeserializeOwned + 'static;

    /// Resolve an already-normalized, non-empty query.
    async fn resolve(&self, normalized_query: &str) -> Result<Vec<Self::Record>, ResolverError>;
}
