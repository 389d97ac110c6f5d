//! File storage backends.
//!
//! Implements the `FileStorage` trait from `filestorage-core`. Only the
//! process-local [`memory::MemoryFileStorage`] lives here; remote backends
//! plug in behind the same trait.

use std::path::Path;

use filestorage_core::router::StorageRouter;
use filestorage_core::storage::BoxFileStorage;
use filestorage_types::config::StorageConfig;

pub mod memory;

pub use memory::MemoryFileStorage;

/// Build a router with a fresh in-memory backend mounted for every
/// namespace listed in `config.storages`.
pub fn memory_router(config: &StorageConfig) -> StorageRouter {
    let mut router = StorageRouter::from_config(config);
    for name in &config.storages {
        router.register(*name, BoxFileStorage::new(MemoryFileStorage::from_config(config)));
    }
    router
}

/// Guess a MIME type from a file name's extension.
///
/// Used when an upsert creates a file without an explicit MIME type.
pub fn detect_mime(filename: &str) -> String {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "json" => "application/json",
        "yaml" | "yml" => "text/yaml",
        "toml" => "text/toml",
        "txt" | "log" => "text/plain",
        "md" | "markdown" => "text/markdown",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" => "text/javascript",
        "xml" => "text/xml",

        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",

        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" => "application/gzip",

        _ => "application/octet-stream",
    }
    .to_string()
}
