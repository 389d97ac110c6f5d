//! Storage configuration types.
//!
//! `StorageConfig` represents the top-level `config.toml` that bounds path
//! lengths, page sizes and the prefix matching mode.

use serde::{Deserialize, Serialize};

use crate::path::{PrefixMatch, StorageName};
use crate::validation::MAX_PATH_LENGTH;

/// Top-level storage configuration.
///
/// Loaded from `~/.filestorage/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Longest accepted path, in bytes.
    #[serde(default = "default_max_path_length")]
    pub max_path_length: usize,

    /// Page size used when a listing request asks for `first = 0`.
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    /// Upper bound on any requested page size.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,

    /// How namespace and filter prefixes are matched. A filter with its own
    /// `match_mode` overrides this.
    #[serde(default)]
    pub prefix_match: PrefixMatch,

    /// Namespaces to mount.
    #[serde(default = "default_storages")]
    pub storages: Vec<StorageName>,
}

fn default_max_path_length() -> usize {
    MAX_PATH_LENGTH
}

fn default_page_size() -> usize {
    100
}

fn default_max_page_size() -> usize {
    1000
}

fn default_storages() -> Vec<StorageName> {
    vec![StorageName::GrafanaDs]
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            max_path_length: default_max_path_length(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            prefix_match: PrefixMatch::default(),
            storages: default_storages(),
        }
    }
}

impl StorageConfig {
    /// Effective page size for a listing request.
    ///
    /// `0` selects the default; anything above the maximum is clamped.
    /// Always at least 1.
    pub fn resolve_page_size(&self, requested: usize) -> usize {
        let size = if requested == 0 {
            self.default_page_size
        } else {
            requested
        };
        size.min(self.max_page_size).max(1)
    }
}
