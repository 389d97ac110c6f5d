//! Namespace router.
//!
//! `StorageRouter` mounts one backend per `StorageName` and accepts
//! namespace-qualified paths (as built by `namespaced_path`), e.g.
//! `grafanads/dashboards/xyz123`. It resolves the namespace, strips it, and
//! forwards the remaining canonical path (`/dashboards/xyz123`) to that
//! namespace's backend. Backends never see the namespace segment, and paths
//! returned from the router are backend paths.

use std::borrow::Cow;
use std::collections::BTreeMap;

use filestorage_types::config::StorageConfig;
use filestorage_types::error::StorageError;
use filestorage_types::file::{File, FileMetadata, ListFilesResponse, Paging, UpsertFileCommand};
use filestorage_types::filter::ListOptions;
use filestorage_types::path::{
    PrefixMatch, ROOT, StorageName, belongs_to_storage_with, namespaced_path,
};
use filestorage_types::validation::validate_path;

use crate::context::StorageContext;
use crate::storage::BoxFileStorage;

pub struct StorageRouter {
    storages: BTreeMap<StorageName, BoxFileStorage>,
    prefix_match: PrefixMatch,
    max_path_length: usize,
}

impl StorageRouter {
    pub fn new(prefix_match: PrefixMatch, max_path_length: usize) -> Self {
        Self {
            storages: BTreeMap::new(),
            prefix_match,
            max_path_length,
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.prefix_match, config.max_path_length)
    }

    /// Mount `storage` under `name`, returning the backend it replaces.
    pub fn register(&mut self, name: StorageName, storage: BoxFileStorage) -> Option<BoxFileStorage> {
        tracing::debug!(storage = %name, "mounting storage backend");
        self.storages.insert(name, storage)
    }

    pub fn storage(&self, name: StorageName) -> Option<&BoxFileStorage> {
        self.storages.get(&name)
    }

    pub fn names(&self) -> impl Iterator<Item = StorageName> + '_ {
        self.storages.keys().copied()
    }

    /// Qualify a backend path with a namespace.
    pub fn qualify(name: StorageName, path: &str) -> String {
        namespaced_path(path, name)
    }

    /// Split a qualified path into its namespace and validated backend path.
    ///
    /// When several namespaces match (possible under `PrefixMatch::Raw`), the
    /// longest one wins.
    pub fn resolve(&self, qualified: &str) -> Result<(StorageName, String), StorageError> {
        let name = StorageName::ALL
            .into_iter()
            .filter(|name| belongs_to_storage_with(qualified, *name, self.prefix_match))
            .max_by_key(|name| name.as_str().len())
            .ok_or_else(|| StorageError::OutsideStorage(qualified.to_string()))?;

        if !self.storages.contains_key(&name) {
            return Err(StorageError::UnknownStorage(name));
        }

        let inner = match &qualified[name.as_str().len()..] {
            "" => ROOT,
            rest => rest,
        };
        validate_path(inner, self.max_path_length)?;

        Ok((name, inner.to_string()))
    }

    fn route(
        &self,
        qualified: &str,
    ) -> Result<(StorageName, &BoxFileStorage, String), StorageError> {
        let (name, inner) = self.resolve(qualified)?;
        let storage = self
            .storages
            .get(&name)
            .ok_or(StorageError::UnknownStorage(name))?;
        tracing::trace!(storage = %name, path = %inner, "routed storage path");
        Ok((name, storage, inner))
    }

    /// Rewrite namespace-qualified filter prefixes (`grafanads/a`) into
    /// backend paths (`/a`). Prefixes already in backend form pass through.
    fn backend_options<'a>(
        &self,
        name: StorageName,
        options: &'a ListOptions,
    ) -> Cow<'a, ListOptions> {
        let qualified = |prefix: &str| belongs_to_storage_with(prefix, name, self.prefix_match);

        let Some(prefixes) = &options.filters.allowed_prefixes else {
            return Cow::Borrowed(options);
        };
        if !prefixes.iter().any(|p| qualified(p)) {
            return Cow::Borrowed(options);
        }

        let stripped = prefixes
            .iter()
            .map(|prefix| {
                if !qualified(prefix) {
                    return prefix.clone();
                }
                match &prefix[name.as_str().len()..] {
                    "" => ROOT.to_string(),
                    rest => rest.to_string(),
                }
            })
            .collect();

        let mut options = options.clone();
        options.filters.allowed_prefixes = Some(stripped);
        Cow::Owned(options)
    }

    #[tracing::instrument(name = "storage.get", skip(self, ctx))]
    pub async fn get(&self, ctx: &StorageContext, path: &str) -> Result<Option<File>, StorageError> {
        let (_, storage, inner) = self.route(path)?;
        ctx.run(storage.get(ctx, &inner)).await
    }

    #[tracing::instrument(name = "storage.delete", skip(self, ctx))]
    pub async fn delete(&self, ctx: &StorageContext, path: &str) -> Result<(), StorageError> {
        let (_, storage, inner) = self.route(path)?;
        ctx.run(storage.delete(ctx, &inner)).await
    }

    /// Consumes the command; its qualified path is replaced by the backend path.
    #[tracing::instrument(name = "storage.upsert", skip(self, ctx, command), fields(path = %command.path))]
    pub async fn upsert(
        &self,
        ctx: &StorageContext,
        mut command: UpsertFileCommand,
    ) -> Result<(), StorageError> {
        let (_, storage, inner) = self.route(&command.path)?;
        command.path = inner;
        ctx.run(storage.upsert(ctx, &command)).await
    }

    /// Filter prefixes may be given qualified (`grafanads/a`) or as backend
    /// paths (`/a`).
    #[tracing::instrument(name = "storage.list_files", skip(self, ctx, options))]
    pub async fn list_files(
        &self,
        ctx: &StorageContext,
        path: &str,
        paging: &Paging,
        options: &ListOptions,
    ) -> Result<ListFilesResponse, StorageError> {
        let (name, storage, inner) = self.route(path)?;
        let options = self.backend_options(name, options);
        ctx.run(storage.list_files(ctx, &inner, paging, &options)).await
    }

    #[tracing::instrument(name = "storage.list_folders", skip(self, ctx, options))]
    pub async fn list_folders(
        &self,
        ctx: &StorageContext,
        path: &str,
        options: &ListOptions,
    ) -> Result<Vec<FileMetadata>, StorageError> {
        let (name, storage, inner) = self.route(path)?;
        let options = self.backend_options(name, options);
        ctx.run(storage.list_folders(ctx, &inner, &options)).await
    }

    #[tracing::instrument(name = "storage.create_folder", skip(self, ctx))]
    pub async fn create_folder(
        &self,
        ctx: &StorageContext,
        path: &str,
        name: &str,
    ) -> Result<(), StorageError> {
        let (_, storage, inner) = self.route(path)?;
        ctx.run(storage.create_folder(ctx, &inner, name)).await
    }

    #[tracing::instrument(name = "storage.delete_folder", skip(self, ctx))]
    pub async fn delete_folder(&self, ctx: &StorageContext, path: &str) -> Result<(), StorageError> {
        let (_, storage, inner) = self.route(path)?;
        ctx.run(storage.delete_folder(ctx, &inner)).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use chrono::Utc;
    use filestorage_types::error::PathError;
    use filestorage_types::filter::PathFilters;
    use filestorage_types::validation::MAX_PATH_LENGTH;

    use super::*;
    use crate::storage::FileStorage;

    /// Records the backend paths it receives.
    #[derive(Default)]
    struct RecordingStorage {
        calls: Mutex<Vec<String>>,
        delay: Option<Duration>,
    }

    impl RecordingStorage {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl FileStorage for std::sync::Arc<RecordingStorage> {
        async fn get(&self, _ctx: &StorageContext, path: &str) -> Result<Option<File>, StorageError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.record(format!("get {path}"));
            let now = Utc::now();
            Ok(Some(File {
                contents: b"data".to_vec(),
                metadata: FileMetadata {
                    name: "x".to_string(),
                    full_path: path.to_string(),
                    mime_type: "text/plain".to_string(),
                    modified: now,
                    created: now,
                    size: 4,
                    properties: BTreeMap::new(),
                },
            }))
        }

        async fn delete(&self, _ctx: &StorageContext, path: &str) -> Result<(), StorageError> {
            self.record(format!("delete {path}"));
            Ok(())
        }

        async fn upsert(
            &self,
            _ctx: &StorageContext,
            command: &UpsertFileCommand,
        ) -> Result<(), StorageError> {
            self.record(format!(
                "upsert {} metadata_only={}",
                command.path,
                command.is_metadata_only()
            ));
            Ok(())
        }

        async fn list_files(
            &self,
            _ctx: &StorageContext,
            path: &str,
            paging: &Paging,
            options: &ListOptions,
        ) -> Result<ListFilesResponse, StorageError> {
            self.record(format!(
                "list_files {path} after={} filters={:?}",
                paging.after, options.filters.allowed_prefixes
            ));
            Ok(ListFilesResponse::default())
        }

        async fn list_folders(
            &self,
            _ctx: &StorageContext,
            path: &str,
            options: &ListOptions,
        ) -> Result<Vec<FileMetadata>, StorageError> {
            self.record(format!(
                "list_folders {path} filters={:?}",
                options.filters.allowed_prefixes
            ));
            Ok(Vec::new())
        }

        async fn create_folder(
            &self,
            _ctx: &StorageContext,
            path: &str,
            name: &str,
        ) -> Result<(), StorageError> {
            self.record(format!("create_folder {path} {name}"));
            Ok(())
        }

        async fn delete_folder(&self, _ctx: &StorageContext, path: &str) -> Result<(), StorageError> {
            self.record(format!("delete_folder {path}"));
            Ok(())
        }
    }

    fn router(mode: PrefixMatch) -> (StorageRouter, std::sync::Arc<RecordingStorage>) {
        let backend = std::sync::Arc::new(RecordingStorage::default());
        let mut router = StorageRouter::new(mode, MAX_PATH_LENGTH);
        router.register(StorageName::GrafanaDs, BoxFileStorage::new(backend.clone()));
        (router, backend)
    }

    #[test]
    fn test_resolve_strips_namespace() {
        let (router, _) = router(PrefixMatch::Segment);
        let qualified = StorageRouter::qualify(StorageName::GrafanaDs, "/dashboards/xyz123");
        assert_eq!(qualified, "grafanads/dashboards/xyz123");

        let (name, inner) = router.resolve(&qualified).unwrap();
        assert_eq!(name, StorageName::GrafanaDs);
        assert_eq!(inner, "/dashboards/xyz123");

        let (_, root) = router.resolve("grafanads").unwrap();
        assert_eq!(root, "/");
    }

    #[test]
    fn test_resolve_rejects_foreign_paths() {
        let (router, _) = router(PrefixMatch::Segment);
        assert!(matches!(
            router.resolve("/general/dashboards/xyz124"),
            Err(StorageError::OutsideStorage(_))
        ));
        assert!(matches!(
            router.resolve("grafanadsdash/x"),
            Err(StorageError::OutsideStorage(_))
        ));
    }

    #[test]
    fn test_resolve_raw_mode_surfaces_relative_remainder() {
        let (router, _) = router(PrefixMatch::Raw);
        assert!(matches!(
            router.resolve("grafanadsdash/x"),
            Err(StorageError::InvalidPath(PathError::Relative))
        ));
    }

    #[test]
    fn test_resolve_validates_inner_path() {
        let (router, _) = router(PrefixMatch::Segment);
        assert!(matches!(
            router.resolve("grafanads/a/"),
            Err(StorageError::InvalidPath(PathError::EndsWithDelimiter))
        ));
        assert!(matches!(
            router.resolve("grafanads//a"),
            Err(StorageError::InvalidPath(PathError::NonCanonical))
        ));
    }

    #[test]
    fn test_resolve_unmounted_namespace() {
        let router = StorageRouter::new(PrefixMatch::Segment, MAX_PATH_LENGTH);
        assert!(matches!(
            router.resolve("grafanads/a"),
            Err(StorageError::UnknownStorage(StorageName::GrafanaDs))
        ));
        assert_eq!(router.names().count(), 0);
    }

    #[tokio::test]
    async fn test_operations_forward_backend_paths() {
        let (router, backend) = router(PrefixMatch::Segment);
        let ctx = StorageContext::new();

        let file = router.get(&ctx, "grafanads/a/b.txt").await.unwrap().unwrap();
        assert_eq!(file.full_path, "/a/b.txt");

        router.delete(&ctx, "grafanads/a/b.txt").await.unwrap();
        router
            .upsert(&ctx, UpsertFileCommand::new("grafanads/x").with_property("a", "b"))
            .await
            .unwrap();
        router
            .list_files(&ctx, "grafanads", &Paging::default(), &ListOptions::default())
            .await
            .unwrap();
        router
            .list_folders(&ctx, "grafanads/a", &ListOptions::recursive())
            .await
            .unwrap();
        router.create_folder(&ctx, "grafanads/a", "c").await.unwrap();
        router.delete_folder(&ctx, "grafanads/a/c").await.unwrap();

        let calls = backend.calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![
                "get /a/b.txt",
                "delete /a/b.txt",
                "upsert /x metadata_only=true",
                "list_files / after= filters=None",
                "list_folders /a filters=None",
                "create_folder /a c",
                "delete_folder /a/c",
            ]
        );
    }

    #[tokio::test]
    async fn test_qualified_filter_prefixes_become_backend_paths() {
        let (router, backend) = router(PrefixMatch::Segment);
        let ctx = StorageContext::new();
        let filters = PathFilters::new(["grafanads/a", "/b", "grafanads"]);
        let options = ListOptions::recursive().with_filters(filters);

        router
            .list_files(&ctx, "grafanads", &Paging::default(), &options)
            .await
            .unwrap();
        router.list_folders(&ctx, "grafanads", &options).await.unwrap();

        let calls = backend.calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![
                r#"list_files / after= filters=Some(["/a", "/b", "/"])"#,
                r#"list_folders / filters=Some(["/a", "/b", "/"])"#,
            ]
        );
    }

    #[tokio::test]
    async fn test_upsert_forwards_contents_and_metadata() {
        let (router, backend) = router(PrefixMatch::Segment);
        let ctx = StorageContext::new();

        router
            .upsert(
                &ctx,
                UpsertFileCommand::new("grafanads/d/e.json")
                    .with_contents(b"{}".to_vec())
                    .with_mime_type("application/json"),
            )
            .await
            .unwrap();

        let calls = backend.calls.lock().unwrap().clone();
        assert_eq!(calls, vec!["upsert /d/e.json metadata_only=false"]);
    }

    #[tokio::test]
    async fn test_cancelled_context_short_circuits() {
        let (router, backend) = router(PrefixMatch::Segment);
        let ctx = StorageContext::new();
        ctx.cancel();

        let result = router.delete(&ctx, "grafanads/a").await;
        assert!(matches!(result, Err(StorageError::Cancelled)));
        assert!(backend.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_timeout_applies_to_backend_call() {
        let backend = std::sync::Arc::new(RecordingStorage {
            delay: Some(Duration::from_secs(30)),
            ..Default::default()
        });
        let mut router = StorageRouter::new(PrefixMatch::Segment, MAX_PATH_LENGTH);
        router.register(StorageName::GrafanaDs, BoxFileStorage::new(backend));

        let ctx = StorageContext::with_timeout(Duration::from_millis(10));
        let result = router.get(&ctx, "grafanads/slow").await;
        assert!(matches!(result, Err(StorageError::DeadlineExceeded)));
    }

    #[test]
    fn test_register_replaces_existing_backend() {
        let (mut router, _) = router(PrefixMatch::Segment);
        let replaced = router.register(
            StorageName::GrafanaDs,
            BoxFileStorage::new(std::sync::Arc::new(RecordingStorage::default())),
        );
        assert!(replaced.is_some());
        assert!(router.storage(StorageName::GrafanaDs).is_some());
    }
}
