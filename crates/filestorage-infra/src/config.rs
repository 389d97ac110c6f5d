//! Storage configuration loader.
//!
//! Reads `config.toml` from the data directory (`~/.filestorage/` unless
//! overridden) and deserializes it into [`StorageConfig`]. Falls back to
//! defaults when the file is missing or malformed.

use std::path::{Path, PathBuf};

use filestorage_types::config::StorageConfig;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "FILESTORAGE_DATA_DIR";

/// Load storage configuration from `{data_dir}/config.toml`.
///
/// - Missing file: [`StorageConfig::default()`].
/// - Unreadable or unparsable file: logs a warning and returns the default.
pub async fn load_storage_config(data_dir: &Path) -> StorageConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %config_path.display(), "no config.toml found, using defaults");
            return StorageConfig::default();
        }
        Err(err) => {
            tracing::warn!(path = %config_path.display(), %err, "failed to read config, using defaults");
            return StorageConfig::default();
        }
    };

    match toml::from_str::<StorageConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(path = %config_path.display(), %err, "failed to parse config, using defaults");
            StorageConfig::default()
        }
    }
}

/// Resolve the data directory.
///
/// `FILESTORAGE_DATA_DIR` wins; otherwise `~/.filestorage`, or `.filestorage`
/// in the working directory when no home directory is known.
pub fn default_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".filestorage");
    }

    PathBuf::from(".filestorage")
}
