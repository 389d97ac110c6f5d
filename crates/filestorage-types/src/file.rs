//! File and listing types.
//!
//! These model a stored file's catalog record, its contents, cursor-based
//! listing pages and the upsert command.

use std::collections::BTreeMap;
use std::ops::Deref;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// MIME type reported for folder entries.
pub const FOLDER_MIME_TYPE: &str = "directory";

/// Catalog record of a stored file or folder, independent of its contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub name: String,
    pub full_path: String,
    pub mime_type: String,
    pub modified: DateTime<Utc>,
    pub created: DateTime<Utc>,
    pub size: u64,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

/// A file read from storage: raw bytes plus metadata.
///
/// Values are snapshots. Updating a file goes through `upsert` and produces
/// a new value on the next read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub contents: Vec<u8>,
    #[serde(flatten)]
    pub metadata: FileMetadata,
}

impl Deref for File {
    type Target = FileMetadata;

    fn deref(&self) -> &Self::Target {
        &self.metadata
    }
}

/// One page of a file listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFilesResponse {
    pub files: Vec<FileMetadata>,
    /// Whether more matching files follow `last_path`.
    pub has_more: bool,
    /// Full path of the last file in `files`; the cursor for the next page.
    pub last_path: String,
}

impl ListFilesResponse {
    /// Build a page from the files it returns, deriving the cursor.
    pub fn new(files: Vec<FileMetadata>, has_more: bool) -> Self {
        let last_path = files
            .last()
            .map(|f| f.full_path.clone())
            .unwrap_or_default();
        Self {
            files,
            has_more,
            last_path,
        }
    }

    /// Paging request for the page after this one.
    pub fn next_page(&self, first: usize) -> Option<Paging> {
        self.has_more.then(|| Paging {
            after: self.last_path.clone(),
            first,
        })
    }
}

/// Cursor paging parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    /// Exclusive cursor: only paths ordered after this one are returned.
    /// Empty starts from the beginning.
    #[serde(default)]
    pub after: String,
    /// Page size; `0` lets the backend pick its default.
    #[serde(default)]
    pub first: usize,
}

impl Paging {
    pub fn first(first: usize) -> Self {
        Self {
            after: String::new(),
            first,
        }
    }
}

/// Create or update a file.
///
/// `contents: None` is a metadata-only update and leaves the stored bytes
/// alone. `Some(vec![])` replaces them with empty contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertFileCommand {
    pub path: String,
    /// Empty keeps the stored type (or lets the backend detect one on create).
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub contents: Option<Vec<u8>>,
    /// Merged into the stored properties, overwriting existing keys.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl UpsertFileCommand {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_contents(mut self, contents: impl Into<Vec<u8>>) -> Self {
        self.contents = Some(contents.into());
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn is_metadata_only(&self) -> bool {
        self.contents.is_none()
    }
}
