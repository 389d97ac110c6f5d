//! Path allow-list filters and listing options.

use serde::{Deserialize, Serialize};

use crate::path::PrefixMatch;

/// A set of allowed path prefixes scoping a listing.
///
/// `None` or an empty list means unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathFilters {
    #[serde(default)]
    pub allowed_prefixes: Option<Vec<String>>,
    /// Explicit matching mode. `None` defers to the backend's configured
    /// `prefix_match` (or `Raw` through [`PathFilters::is_allowed`]).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_mode: Option<PrefixMatch>,
}

impl PathFilters {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_prefixes: Some(prefixes.into_iter().map(Into::into).collect()),
            match_mode: None,
        }
    }

    pub fn with_match_mode(mut self, mode: PrefixMatch) -> Self {
        self.match_mode = Some(mode);
        self
    }

    pub fn is_unrestricted(&self) -> bool {
        self.allowed_prefixes
            .as_ref()
            .is_none_or(|prefixes| prefixes.is_empty())
    }

    /// Whether `path` starts with at least one allowed prefix.
    pub fn is_allowed(&self, path: &str) -> bool {
        self.is_allowed_with(path, PrefixMatch::default())
    }

    /// Like [`PathFilters::is_allowed`], using `fallback` when no explicit
    /// mode was set.
    pub fn is_allowed_with(&self, path: &str, fallback: PrefixMatch) -> bool {
        let mode = self.match_mode.unwrap_or(fallback);
        match &self.allowed_prefixes {
            None => true,
            Some(prefixes) if prefixes.is_empty() => true,
            Some(prefixes) => prefixes.iter().any(|prefix| mode.matches(path, prefix)),
        }
    }
}

/// [`PathFilters::is_allowed`] for an optional filter; an absent filter
/// allows everything.
pub fn path_allowed(filters: Option<&PathFilters>, path: &str) -> bool {
    filters.is_none_or(|f| f.is_allowed(path))
}

/// Options shared by `list_files` and `list_folders`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    /// Descend into sub-folders instead of listing direct children only.
    #[serde(default)]
    pub recursive: bool,
    #[serde(default)]
    pub filters: PathFilters,
}

impl ListOptions {
    pub fn recursive() -> Self {
        Self {
            recursive: true,
            ..Default::default()
        }
    }

    pub fn with_filters(mut self, filters: PathFilters) -> Self {
        self.filters = filters;
        self
    }
}
