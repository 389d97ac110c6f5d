//! Canonical path validation.
//!
//! Backends call [`validate_path`] before touching any state and fail fast
//! with the matching [`PathError`] sentinel. Paths are never normalised.

use crate::error::PathError;
use crate::path::{DELIMITER, ROOT};

/// Default upper bound on a path's length in bytes.
pub const MAX_PATH_LENGTH: usize = 1024;

/// Punctuation allowed inside a path segment, besides ASCII letters and digits.
const ALLOWED_PUNCTUATION: &[char] = &['!', '-', '_', '.', '*', '\'', '(', ')', ' '];

/// Check that `path` is canonical and within `max_len` bytes.
///
/// Checks run in a fixed order and the first failure is returned:
/// relative, trailing delimiter, non-canonical segment, length, characters.
pub fn validate_path(path: &str, max_len: usize) -> Result<(), PathError> {
    if !path.starts_with(DELIMITER) {
        return Err(PathError::Relative);
    }

    if path == ROOT {
        return Ok(());
    }

    if path.ends_with(DELIMITER) {
        return Err(PathError::EndsWithDelimiter);
    }

    let segments = || path[1..].split(DELIMITER);

    if segments().any(|s| s.is_empty() || s == "." || s == "..") {
        return Err(PathError::NonCanonical);
    }

    if path.len() > max_len {
        return Err(PathError::TooLong);
    }

    if !segments().all(is_valid_segment) {
        return Err(PathError::Invalid);
    }

    Ok(())
}

/// Check a single file or folder name.
pub fn validate_name(name: &str) -> Result<(), PathError> {
    if name.is_empty() || name == "." || name == ".." || name.contains(DELIMITER) {
        return Err(PathError::Invalid);
    }

    if !is_valid_segment(name) {
        return Err(PathError::Invalid);
    }

    Ok(())
}

fn is_valid_segment(segment: &str) -> bool {
    segment
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || ALLOWED_PUNCTUATION.contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(path: &str) -> Result<(), PathError> {
        validate_path(path, MAX_PATH_LENGTH)
    }

    #[test]
    fn test_valid_paths() {
        for p in ["/", "/a", "/dashboards/xyz123", "/a b/c(1).json", "/x/y-z_w*!'"] {
            assert_eq!(check(p), Ok(()), "{p} should be valid");
        }
    }

    #[test]
    fn test_relative_paths() {
        assert_eq!(check(""), Err(PathError::Relative));
        assert_eq!(check("a/b"), Err(PathError::Relative));
        assert_eq!(check("grafanads/a"), Err(PathError::Relative));
    }

    #[test]
    fn test_trailing_delimiter() {
        assert_eq!(check("/a/"), Err(PathError::EndsWithDelimiter));
        assert_eq!(check("//"), Err(PathError::EndsWithDelimiter));
    }

    #[test]
    fn test_non_canonical_paths() {
        assert_eq!(check("//foo"), Err(PathError::NonCanonical));
        assert_eq!(check("/a//b"), Err(PathError::NonCanonical));
        assert_eq!(check("/a/./b"), Err(PathError::NonCanonical));
        assert_eq!(check("/a/../b"), Err(PathError::NonCanonical));
        assert_eq!(check("/.."), Err(PathError::NonCanonical));
    }

    #[test]
    fn test_too_long() {
        let long = format!("/{}", "a".repeat(MAX_PATH_LENGTH));
        assert_eq!(check(&long), Err(PathError::TooLong));

        let exact = format!("/{}", "a".repeat(MAX_PATH_LENGTH - 1));
        assert_eq!(check(&exact), Ok(()));

        assert_eq!(validate_path("/abcdef", 4), Err(PathError::TooLong));
    }

    #[test]
    fn test_invalid_characters() {
        assert_eq!(check("/a\\b"), Err(PathError::Invalid));
        assert_eq!(check("/a?b"), Err(PathError::Invalid));
        assert_eq!(check("/caf\u{e9}"), Err(PathError::Invalid));
        assert_eq!(check("/a\tb"), Err(PathError::Invalid));
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("reports"), Ok(()));
        assert_eq!(validate_name("a b.txt"), Ok(()));
        assert_eq!(validate_name(""), Err(PathError::Invalid));
        assert_eq!(validate_name(".."), Err(PathError::Invalid));
        assert_eq!(validate_name("a/b"), Err(PathError::Invalid));
        assert_eq!(validate_name("a:b"), Err(PathError::Invalid));
    }
}
