//! Product catalog resolver
//!
//! Stands in for the storefront's product search backend: filters a fixed
//! product list and waits a simulated network delay before answering.

use async_trait::async_trait;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::trace;

use crate::core::{Product, ResolverError};
use crate::persistence;
use crate::session::SearchResolver;

/// Simulated round-trip time of the product backend
pub const DEFAULT_NETWORK_DELAY_MS: u64 = 2000;

const BUILTIN_CATALOG: &str = include_str!("products.json");

/// Catalog file layout: product sections, flattened on load
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogFile {
    #[serde(default)]
    products: Vec<Product>,
    #[serde(default)]
    for_you: Vec<Product>,
    #[serde(default)]
    new_arrivals: Vec<Product>,
}

impl CatalogFile {
    fn into_products(self) -> Vec<Product> {
        let mut all = self.products;
        all.extend(self.for_you);
        all.extend(self.new_arrivals);
        all
    }
}

/// Resolver over an in-memory product list
#[derive(Debug, Clone)]
pub struct CatalogResolver {
    products: Vec<Product>,
    network_delay: Duration,
}

impl CatalogResolver {
    /// Resolver over `products` with no delay
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            network_delay: Duration::ZERO,
        }
    }

    /// The catalog shipped with the crate
    pub fn builtin() -> persistence::Result<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Load a catalog from a JSON file with `products`, `forYou` and
    /// `newArrivals` sections
    pub fn from_file<P: AsRef<Path>>(path: P) -> persistence::Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    fn from_json(content: &str) -> persistence::Result<Self> {
        let file: CatalogFile = serde_json::from_str(content)?;
        Ok(Self::new(file.into_products()))
    }

    pub fn with_network_delay(mut self, delay: Duration) -> Self {
        self.network_delay = delay;
        self
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Products matching an already-normalized query, in catalog order
    pub fn filter(&self, normalized_query: &str) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| p.matches(normalized_query))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl SearchResolver for CatalogResolver {
    type Record = Product;

    async fn resolve(&self, normalized_query: &str) -> Result<Vec<Product>, ResolverError> {
        if !self.network_delay.is_zero() {
            tokio::time::sleep(self.network_delay).await;
        }

        let results = self.filter(normalized_query);
        trace!("Catalog matched {} products for query", results.len());
        Ok(results)
    }
}
