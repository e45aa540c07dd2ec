use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::catalog::DEFAULT_NETWORK_DELAY_MS;
use crate::session::{DEFAULT_CACHE_CAPACITY, DEFAULT_RECENT_LIMIT, SessionConfig};

/// Main storefront search configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub persistence: PersistenceConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub capacity: usize,
    pub recent_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    pub enabled: bool,
    pub state_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub network_delay_ms: u64,
    /// Catalog JSON file; the built-in catalog is used when unset
    pub catalog_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `json` or `text`
    pub format: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CACHE_CAPACITY,
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            state_path: PathBuf::from("./data/search-state.json"),
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            network_delay_ms: DEFAULT_NETWORK_DELAY_MS,
            catalog_path: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: StorefrontConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Convert to SessionConfig
    pub fn to_session_config(&self) -> SessionConfig {
        SessionConfig {
            capacity: self.cache.capacity,
            recent_limit: self.cache.recent_limit,
        }
    }

    pub fn network_delay(&self) -> Duration {
        Duration::from_millis(self.resolver.network_delay_ms)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.format.eq_ignore_ascii_case("json")
    }
}
