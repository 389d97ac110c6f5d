//! Application state for the CLI.
//!
//! Holds the resolved data directory, the loaded configuration and a router
//! with every configured namespace mounted.

use std::path::PathBuf;

use filestorage_core::router::StorageRouter;
use filestorage_infra::config::{default_data_dir, load_storage_config};
use filestorage_infra::storage::memory_router;
use filestorage_types::config::StorageConfig;

pub struct AppState {
    pub data_dir: PathBuf,
    pub config: StorageConfig,
    pub router: StorageRouter,
}

impl AppState {
    /// Resolve the data directory (explicit override first) and load
    /// `config.toml` from it.
    pub async fn init(data_dir: Option<PathBuf>) -> Self {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);
        let config = load_storage_config(&data_dir).await;
        tracing::debug!(data_dir = %data_dir.display(), ?config, "loaded storage config");
        Self::with_config(data_dir, config)
    }

    pub fn with_config(data_dir: PathBuf, config: StorageConfig) -> Self {
        let router = memory_router(&config);
        Self {
            data_dir,
            config,
            router,
        }
    }
}
