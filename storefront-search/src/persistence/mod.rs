/// Persistence module for search session state
///
/// Bridges the in-memory session to an external key-value store:
/// - Snapshot encoding in the persisted `{ recent, cache }` layout
/// - File-backed store with atomic replace
/// - In-memory store for tests and disabled persistence
pub mod store;
pub mod types;

pub use store::{FileStore, MemoryStore, SnapshotStore};
pub use types::{PersistenceError, Result, SessionSnapshot, decode_snapshot, encode_snapshot};
