//! File storage trait.
//!
//! Defines the capability set every hierarchical, path-addressed storage
//! backend provides. Implementations live in filestorage-infra.

use filestorage_types::error::StorageError;
use filestorage_types::file::{File, FileMetadata, ListFilesResponse, Paging, UpsertFileCommand};
use filestorage_types::filter::ListOptions;

use crate::context::StorageContext;

/// Trait for file storage backends.
///
/// All paths are canonical (see `filestorage_types::validation`); a backend
/// rejects anything else with the matching `PathError` sentinel before doing
/// any work. Ordering between concurrent calls is the backend's concern.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait FileStorage: Send + Sync {
    /// Read a file's contents and metadata. `None` when no file exists at `path`.
    fn get(
        &self,
        ctx: &StorageContext,
        path: &str,
    ) -> impl std::future::Future<Output = Result<Option<File>, StorageError>> + Send;

    /// Remove a single file. No-op if the file does not exist.
    fn delete(
        &self,
        ctx: &StorageContext,
        path: &str,
    ) -> impl std::future::Future<Output = Result<(), StorageError>> + Send;

    /// Create or update a file.
    ///
    /// When `command.contents` is `None` only the metadata changes.
    fn upsert(
        &self,
        ctx: &StorageContext,
        command: &UpsertFileCommand,
    ) -> impl std::future::Future<Output = Result<(), StorageError>> + Send;

    /// List files under `path`, one cursor page at a time.
    ///
    /// `options.recursive` controls whether descendant folders are traversed.
    fn list_files(
        &self,
        ctx: &StorageContext,
        path: &str,
        paging: &Paging,
        options: &ListOptions,
    ) -> impl std::future::Future<Output = Result<ListFilesResponse, StorageError>> + Send;

    /// List folder entries under `path`.
    fn list_folders(
        &self,
        ctx: &StorageContext,
        path: &str,
        options: &ListOptions,
    ) -> impl std::future::Future<Output = Result<Vec<FileMetadata>, StorageError>> + Send;

    /// Create an empty folder named `name` inside `path`.
    fn create_folder(
        &self,
        ctx: &StorageContext,
        path: &str,
        name: &str,
    ) -> impl std::future::Future<Output = Result<(), StorageError>> + Send;

    /// Remove a folder and everything below it.
    fn delete_folder(
        &self,
        ctx: &StorageContext,
        path: &str,
    ) -> impl std::future::Future<Output = Result<(), StorageError>> + Send;
}
