use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Blob and document storage configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Root directory for all stored asset data. Default: "./data".
    #[serde(default = "default_root")]
    pub root: String,
    /// Maximum accepted blob size in bytes. Default: 512 MiB.
    #[serde(default = "default_max_blob_size")]
    pub max_blob_size: u64,
}

fn default_root() -> String {
    "./data".into()
}
fn default_max_blob_size() -> u64 {
    512 * 1024 * 1024
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            max_blob_size: default_max_blob_size(),
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., ARMORY__STORAGE__ROOT)
            .add_source(Environment::with_prefix("ARMORY").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
