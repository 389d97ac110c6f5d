use thiserror::Error;

use crate::path::StorageName;

/// Path validation sentinels.
///
/// Returned when a caller-supplied path fails the canonical-form checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("path cant be relative")]
    Relative,

    #[error("path must be canonical")]
    NonCanonical,

    #[error("path is too long")]
    TooLong,

    #[error("path is invalid")]
    Invalid,

    #[error("path can not end with delimiter")]
    EndsWithDelimiter,
}

/// Errors from file storage operations (used by the `FileStorage` contract in filestorage-core).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    InvalidPath(#[from] PathError),

    /// Reserved for backends whose reads fail on a missing path.
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("file contents are required to create '{0}'")]
    ContentsRequired(String),

    #[error("path '{0}' does not belong to any registered storage")]
    OutsideStorage(String),

    #[error("no backend registered for storage '{0}'")]
    UnknownStorage(StorageName),

    #[error("operation cancelled")]
    Cancelled,

    #[error("operation deadline exceeded")]
    DeadlineExceeded,

    /// Reserved for external backends to report transport or driver failures.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// A string that does not name any [`StorageName`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown storage name '{0}'")]
pub struct UnknownStorageName(pub String);
