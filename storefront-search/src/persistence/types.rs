use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cache::CacheSnapshot;

/// Persistence error types
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for PersistenceError {
    fn from(e: serde_json::Error) -> Self {
        PersistenceError::SerializationError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PersistenceError>;

/// Persisted search state: recent queries plus the full result cache.
///
/// Either field may be missing from stored data and defaults to empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct SessionSnapshot<T> {
    /// Most recent first
    #[serde(default)]
    pub recent: Vec<String>,
    #[serde(default)]
    pub cache: CacheSnapshot<Vec<T>>,
}

impl<T> Default for SessionSnapshot<T> {
    fn default() -> Self {
        Self {
            recent: Vec::new(),
            cache: CacheSnapshot::default(),
        }
    }
}

/// Encode a snapshot into the string payload handed to a [`super::SnapshotStore`]
pub fn encode_snapshot<T: Serialize>(snapshot: &SessionSnapshot<T>) -> Result<String> {
    Ok(serde_json::to_string(snapshot)?)
}

/// Decode a stored payload back into a snapshot
pub fn decode_snapshot<T: DeserializeOwned>(payload: &str) -> Result<SessionSnapshot<T>> {
    Ok(serde_json::from_str(payload)?)
}
