//! Store configuration.

use std::path::PathBuf;

/// Default on-disk location of the single-file store.
const DEFAULT_DATA_FILE: &str = "flowmart_store.json";

/// Configuration for the file-backed store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Path of the JSON store file.
    pub data_file: PathBuf,
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable             | Required | Default               |
    /// |----------------------|----------|-----------------------|
    /// | `FLOWMART_DATA_FILE` | no       | `flowmart_store.json` |
    pub fn from_env() -> Self {
        let data_file = std::env::var("FLOWMART_DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_FILE));
        Self { data_file }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
        }
    }
}
