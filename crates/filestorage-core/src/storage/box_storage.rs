//! BoxFileStorage -- object-safe dynamic dispatch wrapper for FileStorage.
//!
//! 1. Define an object-safe `FileStorageDyn` trait with boxed futures
//! 2. Blanket-impl `FileStorageDyn` for all `T: FileStorage`
//! 3. `BoxFileStorage` wraps `Box<dyn FileStorageDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use filestorage_types::error::StorageError;
use filestorage_types::file::{File, FileMetadata, ListFilesResponse, Paging, UpsertFileCommand};
use filestorage_types::filter::ListOptions;

use super::file_storage::FileStorage;
use crate::context::StorageContext;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StorageError>> + Send + 'a>>;

/// Object-safe version of [`FileStorage`] with boxed futures.
///
/// This trait exists solely to enable dynamic dispatch (`dyn FileStorageDyn`).
/// A blanket implementation is provided for all types implementing `FileStorage`.
pub trait FileStorageDyn: Send + Sync {
    fn get_boxed<'a>(
        &'a self,
        ctx: &'a StorageContext,
        path: &'a str,
    ) -> BoxFuture<'a, Option<File>>;

    fn delete_boxed<'a>(&'a self, ctx: &'a StorageContext, path: &'a str) -> BoxFuture<'a, ()>;

    fn upsert_boxed<'a>(
        &'a self,
        ctx: &'a StorageContext,
        command: &'a UpsertFileCommand,
    ) -> BoxFuture<'a, ()>;

    fn list_files_boxed<'a>(
        &'a self,
        ctx: &'a StorageContext,
        path: &'a str,
        paging: &'a Paging,
        options: &'a ListOptions,
    ) -> BoxFuture<'a, ListFilesResponse>;

    fn list_folders_boxed<'a>(
        &'a self,
        ctx: &'a StorageContext,
        path: &'a str,
        options: &'a ListOptions,
    ) -> BoxFuture<'a, Vec<FileMetadata>>;

    fn create_folder_boxed<'a>(
        &'a self,
        ctx: &'a StorageContext,
        path: &'a str,
        name: &'a str,
    ) -> BoxFuture<'a, ()>;

    fn delete_folder_boxed<'a>(
        &'a self,
        ctx: &'a StorageContext,
        path: &'a str,
    ) -> BoxFuture<'a, ()>;
}

/// Blanket implementation: any `FileStorage` automatically implements `FileStorageDyn`.
impl<T: FileStorage> FileStorageDyn for T {
    fn get_boxed<'a>(
        &'a self,
        ctx: &'a StorageContext,
        path: &'a str,
    ) -> BoxFuture<'a, Option<File>> {
        Box::pin(self.get(ctx, path))
    }

    fn delete_boxed<'a>(&'a self, ctx: &'a StorageContext, path: &'a str) -> BoxFuture<'a, ()> {
        Box::pin(self.delete(ctx, path))
    }

    fn upsert_boxed<'a>(
        &'a self,
        ctx: &'a StorageContext,
        command: &'a UpsertFileCommand,
    ) -> BoxFuture<'a, ()> {
        Box::pin(self.upsert(ctx, command))
    }

    fn list_files_boxed<'a>(
        &'a self,
        ctx: &'a StorageContext,
        path: &'a str,
        paging: &'a Paging,
        options: &'a ListOptions,
    ) -> BoxFuture<'a, ListFilesResponse> {
        Box::pin(self.list_files(ctx, path, paging, options))
    }

    fn list_folders_boxed<'a>(
        &'a self,
        ctx: &'a StorageContext,
        path: &'a str,
        options: &'a ListOptions,
    ) -> BoxFuture<'a, Vec<FileMetadata>> {
        Box::pin(self.list_folders(ctx, path, options))
    }

    fn create_folder_boxed<'a>(
        &'a self,
        ctx: &'a StorageContext,
        path: &'a str,
        name: &'a str,
    ) -> BoxFuture<'a, ()> {
        Box::pin(self.create_folder(ctx, path, name))
    }

    fn delete_folder_boxed<'a>(
        &'a self,
        ctx: &'a StorageContext,
        path: &'a str,
    ) -> BoxFuture<'a, ()> {
        Box::pin(self.delete_folder(ctx, path))
    }
}

/// Type-erased file storage backend.
///
/// Callers that must stay polymorphic over backends at runtime (e.g. the
/// namespace router) hold a `BoxFileStorage` instead of a generic `S: FileStorage`.
pub struct BoxFileStorage {
    inner: Box<dyn FileStorageDyn>,
}

impl BoxFileStorage {
    pub fn new<T: FileStorage + 'static>(storage: T) -> Self {
        Self {
            inner: Box::new(storage),
        }
    }

    pub async fn get(
        &self,
        ctx: &StorageContext,
        path: &str,
    ) -> Result<Option<File>, StorageError> {
        self.inner.get_boxed(ctx, path).await
    }

    pub async fn delete(&self, ctx: &StorageContext, path: &str) -> Result<(), StorageError> {
        self.inner.delete_boxed(ctx, path).await
    }

    pub async fn upsert(
        &self,
        ctx: &StorageContext,
        command: &UpsertFileCommand,
    ) -> Result<(), StorageError> {
        self.inner.upsert_boxed(ctx, command).await
    }

    pub async fn list_files(
        &self,
        ctx: &StorageContext,
        path: &str,
        paging: &Paging,
        options: &ListOptions,
    ) -> Result<ListFilesResponse, StorageError> {
        self.inner.list_files_boxed(ctx, path, paging, options).await
    }

    pub async fn list_folders(
        &self,
        ctx: &StorageContext,
        path: &str,
        options: &ListOptions,
    ) -> Result<Vec<FileMetadata>, StorageError> {
        self.inner.list_folders_boxed(ctx, path, options).await
    }

    pub async fn create_folder(
        &self,
        ctx: &StorageContext,
        path: &str,
        name: &str,
    ) -> Result<(), StorageError> {
        self.inner.create_folder_boxed(ctx, path, name).await
    }

    pub async fn delete_folder(&self, ctx: &StorageContext, path: &str) -> Result<(), StorageError> {
        self.inner.delete_folder_boxed(ctx, path).await
    }
}
