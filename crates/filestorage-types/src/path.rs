//! Path model for namespaced file storage.
//!
//! Every path handed to or returned from a `FileStorage` backend is canonical:
//! absolute, `/`-delimited, without a trailing delimiter. A [`StorageName`]
//! partitions the path space; [`namespaced_path`] builds the qualified key and
//! [`belongs_to_storage`] checks membership.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownStorageName;

/// The single path separator.
pub const DELIMITER: char = '/';

/// [`DELIMITER`] as a string slice, for concatenation and prefix checks.
pub const DELIMITER_STR: &str = "/";

/// The root folder of every storage.
pub const ROOT: &str = "/";

/// Logical storage namespace tag.
///
/// The set of namespaces is fixed at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StorageName {
    /// Storage backed by a data source.
    #[serde(rename = "grafanads")]
    GrafanaDs,
}

impl StorageName {
    /// Every known namespace, in declaration order.
    pub const ALL: [StorageName; 1] = [StorageName::GrafanaDs];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageName::GrafanaDs => "grafanads",
        }
    }
}

impl fmt::Display for StorageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageName {
    type Err = UnknownStorageName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StorageName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| UnknownStorageName(s.to_string()))
    }
}

/// How a prefix is compared against a path.
///
/// `Raw` is a plain string-prefix test, so `"git"` matches `"github/x"`.
/// `Segment` additionally requires the prefix to end on a segment boundary:
/// the next character must be the delimiter, or the path must end there.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrefixMatch {
    #[default]
    Raw,
    Segment,
}

impl PrefixMatch {
    /// Whether `path` starts with `prefix` under this matching mode.
    pub fn matches(self, path: &str, prefix: &str) -> bool {
        let Some(rest) = path.strip_prefix(prefix) else {
            return false;
        };

        match self {
            PrefixMatch::Raw => true,
            PrefixMatch::Segment => {
                prefix.is_empty()
                    || prefix.ends_with(DELIMITER)
                    || rest.is_empty()
                    || rest.starts_with(DELIMITER)
            }
        }
    }
}

/// Qualify `path` with the storage namespace.
///
/// A leading delimiter on `path` is reused rather than doubled:
/// `("/dash/x", grafanads)` gives `"grafanads/dash/x"` and `("dash/x", grafanads)`
/// gives the same. Repeated leading delimiters are kept as-is.
pub fn namespaced_path(path: &str, storage: StorageName) -> String {
    if path.starts_with(DELIMITER) {
        format!("{storage}{path}")
    } else {
        format!("{storage}{DELIMITER}{path}")
    }
}

/// Raw string-prefix membership test.
///
/// Note that `"grafanadsx/a"` belongs to `grafanads` under this test; use
/// [`belongs_to_storage_with`] and [`PrefixMatch::Segment`] for a segment-safe check.
pub fn belongs_to_storage(path: &str, storage: StorageName) -> bool {
    belongs_to_storage_with(path, storage, PrefixMatch::Raw)
}

pub fn belongs_to_storage_with(path: &str, storage: StorageName, mode: PrefixMatch) -> bool {
    mode.matches(path, storage.as_str())
}

/// Parent folder of a canonical path. The root is its own parent.
pub fn parent_of(path: &str) -> &str {
    match path.rfind(DELIMITER) {
        Some(0) | None => ROOT,
        Some(idx) => &path[..idx],
    }
}

/// Last segment of a canonical path (empty for the root).
pub fn file_name(path: &str) -> &str {
    match path.rfind(DELIMITER) {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Append `name` to a canonical folder path.
pub fn join(parent: &str, name: &str) -> String {
    if parent.ends_with(DELIMITER) {
        format!("{parent}{name}")
    } else {
        format!("{parent}{DELIMITER}{name}")
    }
}

/// Whether `path` lies strictly below `ancestor`.
pub fn is_descendant(path: &str, ancestor: &str) -> bool {
    path != ancestor && PrefixMatch::Segment.matches(path, ancestor)
}

/// Every proper ancestor of a canonical path, nearest to the root first,
/// excluding the root itself.
///
/// `"/a/b/c"` yields `["/a", "/a/b"]`.
pub fn ancestors(path: &str) -> Vec<&str> {
    path.match_indices(DELIMITER)
        .map(|(idx, _)| idx)
        .filter(|&idx| idx > 0)
        .map(|idx| &path[..idx])
        .collect()
}
