pub mod error;
pub mod types;

pub use error::{ResolverError, Result, SearchError};
pub use types::{Product, normalize_query};
