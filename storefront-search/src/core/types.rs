use serde::{Deserialize, Serialize};

/// Normalize a raw search query into its cache key form.
///
/// Leading and trailing whitespace is trimmed and the remainder lower-cased,
/// so `"  Shoes "` and `"shoes"` address the same cache entry.
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Product record returned by the catalog and stored in the search cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Price in whole rupees
    pub price: u64,
    pub rating: f32,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Product {
    /// Case-insensitive substring match on name, description or any tag.
    ///
    /// `normalized_query` must already be lower-cased.
    pub fn matches(&self, normalized_query: &str) -> bool {
        if normalized_query.is_empty() {
            return false;
        }

        self.name.to_lowercase().contains(normalized_query)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(normalized_query))
            || self.tags.as_ref().is_some_and(|tags| {
                tags.iter()
                    .any(|t| t.to_lowercase().contains(normalized_query))
            })
    }
}
