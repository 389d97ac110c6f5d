//! In-memory file storage implementation.
//!
//! Implements the `FileStorage` trait from `filestorage-core` over an ordered
//! map keyed by canonical path. Folders are explicit entries; writing a file
//! creates any missing ancestor folders. The root folder `/` always exists.
//!
//! Ordering of the map is byte order of the path, which is also the cursor
//! order for `list_files`.

use std::collections::BTreeMap;
use std::ops::Bound;

use chrono::{DateTime, Utc};
use filestorage_core::context::StorageContext;
use filestorage_core::storage::FileStorage;
use filestorage_types::config::StorageConfig;
use filestorage_types::error::{PathError, StorageError};
use filestorage_types::file::{
    FOLDER_MIME_TYPE, File, FileMetadata, ListFilesResponse, Paging, UpsertFileCommand,
};
use filestorage_types::filter::ListOptions;
use filestorage_types::path::{ROOT, ancestors, file_name, is_descendant, join, parent_of};
use filestorage_types::validation::{validate_name, validate_path};
use tokio::sync::RwLock;

use super::detect_mime;

enum Entry {
    File(File),
    Folder(FileMetadata),
}

/// Process-local storage backend.
///
/// Reads share a `tokio::sync::RwLock`; each mutation holds the write lock
/// for its whole duration, so concurrent upserts and deletes are serialized.
pub struct MemoryFileStorage {
    entries: RwLock<BTreeMap<String, Entry>>,
    config: StorageConfig,
}

impl Default for MemoryFileStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFileStorage {
    pub fn new() -> Self {
        Self::from_config(&StorageConfig::default())
    }

    /// Create an empty storage honouring the path and paging limits of `config`.
    pub fn from_config(config: &StorageConfig) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(ROOT.to_string(), Entry::Folder(folder_metadata(ROOT, Utc::now())));
        Self {
            entries: RwLock::new(entries),
            config: config.clone(),
        }
    }

    fn validate(&self, path: &str) -> Result<(), StorageError> {
        validate_path(path, self.config.max_path_length)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn folder_metadata(path: &str, now: DateTime<Utc>) -> FileMetadata {
    FileMetadata {
        name: file_name(path).to_string(),
        full_path: path.to_string(),
        mime_type: FOLDER_MIME_TYPE.to_string(),
        modified: now,
        created: now,
        size: 0,
        properties: BTreeMap::new(),
    }
}

/// Create every folder in `paths` that does not exist yet.
///
/// Fails without touching the map if any of them is occupied by a file.
fn ensure_folders(
    entries: &mut BTreeMap<String, Entry>,
    paths: &[&str],
    now: DateTime<Utc>,
) -> Result<(), StorageError> {
    if let Some(blocked) = paths
        .iter()
        .find(|p| matches!(entries.get(**p), Some(Entry::File(_))))
    {
        return Err(StorageError::Conflict(format!("'{blocked}' is a file")));
    }

    for path in paths {
        if !entries.contains_key(*path) {
            tracing::debug!(path, "creating folder");
            entries.insert(path.to_string(), Entry::Folder(folder_metadata(path, now)));
        }
    }

    Ok(())
}

/// Whether `candidate` is listed under `folder` for the given recursion mode.
fn in_scope(candidate: &str, folder: &str, recursive: bool) -> bool {
    if recursive {
        is_descendant(candidate, folder)
    } else {
        candidate != folder && parent_of(candidate) == folder
    }
}

// ---------------------------------------------------------------------------
// FileStorage implementation
// ---------------------------------------------------------------------------

impl FileStorage for MemoryFileStorage {
    async fn get(&self, ctx: &StorageContext, path: &str) -> Result<Option<File>, StorageError> {
        ctx.check()?;
        self.validate(path)?;

        let entries = self.entries.read().await;
        match entries.get(path) {
            Some(Entry::File(file)) => Ok(Some(file.clone())),
            _ => Ok(None),
        }
    }

    async fn delete(&self, ctx: &StorageContext, path: &str) -> Result<(), StorageError> {
        ctx.check()?;
        self.validate(path)?;

        let mut entries = self.entries.write().await;
        match entries.get(path) {
            Some(Entry::Folder(_)) => Err(StorageError::Conflict(format!("'{path}' is a folder"))),
            Some(Entry::File(_)) => {
                entries.remove(path);
                tracing::debug!(path, "deleted file");
                Ok(())
            }
            None => Ok(()),
        }
    }

    async fn upsert(
        &self,
        ctx: &StorageContext,
        command: &UpsertFileCommand,
    ) -> Result<(), StorageError> {
        ctx.check()?;
        let path = command.path.as_str();
        self.validate(path)?;

        let now = Utc::now();
        let mut entries = self.entries.write().await;

        if let Some(entry) = entries.get_mut(path) {
            let Entry::File(file) = entry else {
                return Err(StorageError::Conflict(format!("'{path}' is a folder")));
            };

            if let Some(contents) = &command.contents {
                file.contents = contents.clone();
                file.metadata.size = contents.len() as u64;
            }
            if !command.mime_type.is_empty() {
                file.metadata.mime_type = command.mime_type.clone();
            }
            file.metadata
                .properties
                .extend(command.properties.iter().map(|(k, v)| (k.clone(), v.clone())));
            file.metadata.modified = now;

            tracing::debug!(
                path,
                metadata_only = command.is_metadata_only(),
                size = file.metadata.size,
                "updated file"
            );
            return Ok(());
        }

        let contents = command
            .contents
            .clone()
            .ok_or_else(|| StorageError::ContentsRequired(path.to_string()))?;

        ensure_folders(&mut entries, &ancestors(path), now)?;

        let name = file_name(path).to_string();
        let mime_type = if command.mime_type.is_empty() {
            detect_mime(&name)
        } else {
            command.mime_type.clone()
        };
        let size = contents.len() as u64;

        entries.insert(
            path.to_string(),
            Entry::File(File {
                contents,
                metadata: FileMetadata {
                    name,
                    full_path: path.to_string(),
                    mime_type,
                    modified: now,
                    created: now,
                    size,
                    properties: command.properties.clone(),
                },
            }),
        );

        tracing::debug!(path, size, "created file");
        Ok(())
    }

    async fn list_files(
        &self,
        ctx: &StorageContext,
        path: &str,
        paging: &Paging,
        options: &ListOptions,
    ) -> Result<ListFilesResponse, StorageError> {
        ctx.check()?;
        self.validate(path)?;

        let first = self.config.resolve_page_size(paging.first);
        let lower = if paging.after.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(paging.after.as_str())
        };

        let entries = self.entries.read().await;
        let mut matching = entries
            .range::<str, _>((lower, Bound::Unbounded))
            .filter_map(|(key, entry)| match entry {
                Entry::File(file)
                    if in_scope(key, path, options.recursive)
                        && options.filters.is_allowed_with(key, self.config.prefix_match) =>
                {
                    Some(&file.metadata)
                }
                _ => None,
            });

        let files: Vec<FileMetadata> = matching.by_ref().take(first).cloned().collect();
        let has_more = matching.next().is_some();

        Ok(ListFilesResponse::new(files, has_more))
    }

    async fn list_folders(
        &self,
        ctx: &StorageContext,
        path: &str,
        options: &ListOptions,
    ) -> Result<Vec<FileMetadata>, StorageError> {
        ctx.check()?;
        self.validate(path)?;

        let entries = self.entries.read().await;
        let folders = entries
            .iter()
            .filter_map(|(key, entry)| match entry {
                Entry::Folder(metadata)
                    if in_scope(key, path, options.recursive)
                        && options.filters.is_allowed_with(key, self.config.prefix_match) =>
                {
                    Some(metadata.clone())
                }
                _ => None,
            })
            .collect();

        Ok(folders)
    }

    async fn create_folder(
        &self,
        ctx: &StorageContext,
        path: &str,
        name: &str,
    ) -> Result<(), StorageError> {
        ctx.check()?;
        self.validate(path)?;
        validate_name(name)?;

        let target = join(path, name);
        self.validate(&target)?;

        let mut chain = ancestors(&target);
        chain.push(&target);

        let mut entries = self.entries.write().await;
        ensure_folders(&mut entries, &chain, Utc::now())
    }

    async fn delete_folder(&self, ctx: &StorageContext, path: &str) -> Result<(), StorageError> {
        ctx.check()?;
        self.validate(path)?;
        if path == ROOT {
            return Err(StorageError::InvalidPath(PathError::Invalid));
        }

        let mut entries = self.entries.write().await;
        match entries.get(path) {
            None => Ok(()),
            Some(Entry::File(_)) => Err(StorageError::Conflict(format!("'{path}' is a file"))),
            Some(Entry::Folder(_)) => {
                let before = entries.len();
                entries.retain(|key, _| key != path && !is_descendant(key, path));
                tracing::debug!(path, removed = before - entries.len(), "deleted folder");
                Ok(())
            }
        }
    }
}
