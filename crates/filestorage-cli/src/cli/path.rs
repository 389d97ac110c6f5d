//! Path inspection subcommands: qualify, belongs, validate, allowed, route.

use anyhow::{Result, bail};
use console::style;
use filestorage_core::router::StorageRouter;
use filestorage_types::error::PathError;
use filestorage_types::filter::PathFilters;
use filestorage_types::path::{PrefixMatch, StorageName, belongs_to_storage_with};
use filestorage_types::validation::validate_path;

use crate::state::AppState;

/// `--segment` forces segment matching; otherwise the configured mode applies.
fn match_mode(state: &AppState, segment: bool) -> PrefixMatch {
    if segment {
        PrefixMatch::Segment
    } else {
        state.config.prefix_match
    }
}

fn check_mark(ok: bool) -> String {
    if ok {
        format!("{}", style("✓").green())
    } else {
        format!("{}", style("✗").red())
    }
}

fn validate_all(paths: &[String], max_len: usize) -> Vec<(&str, Result<(), PathError>)> {
    paths
        .iter()
        .map(|p| (p.as_str(), validate_path(p, max_len)))
        .collect()
}

fn allow_filters(prefixes: Vec<String>, mode: PrefixMatch) -> PathFilters {
    PathFilters::new(prefixes).with_match_mode(mode)
}

pub fn qualify(path: &str, storage: StorageName, json: bool) -> Result<()> {
    let qualified = StorageRouter::qualify(storage, path);

    if json {
        let result = serde_json::json!({
            "path": path,
            "storage": storage,
            "qualified": qualified,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{qualified}");
    }

    Ok(())
}

pub fn belongs(
    state: &AppState,
    path: &str,
    storage: StorageName,
    segment: bool,
    json: bool,
) -> Result<()> {
    let mode = match_mode(state, segment);
    let belongs = belongs_to_storage_with(path, storage, mode);

    if json {
        let result = serde_json::json!({
            "path": path,
            "storage": storage,
            "match_mode": mode,
            "belongs": belongs,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "  {} '{}' {} to {}",
            check_mark(belongs),
            style(path).cyan(),
            if belongs { "belongs" } else { "does not belong" },
            style(storage).cyan(),
        );
    }

    Ok(())
}

/// Validate every path, printing a line each. Fails if any path is invalid.
pub fn validate(state: &AppState, paths: &[String], json: bool) -> Result<()> {
    let results = validate_all(paths, state.config.max_path_length);
    let invalid = results.iter().filter(|(_, r)| r.is_err()).count();

    if json {
        let entries: Vec<_> = results
            .iter()
            .map(|(path, result)| {
                serde_json::json!({
                    "path": path,
                    "valid": result.is_ok(),
                    "error": result.err().map(|e| e.to_string()),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for (path, result) in &results {
            match result {
                Ok(()) => println!("  {} {}", check_mark(true), path),
                Err(e) => println!("  {} {}  {}", check_mark(false), path, style(e).dim()),
            }
        }
    }

    if invalid > 0 {
        bail!("{invalid} of {} paths are invalid", results.len());
    }
    Ok(())
}

pub fn allowed(
    state: &AppState,
    path: &str,
    prefixes: Vec<String>,
    segment: bool,
    json: bool,
) -> Result<()> {
    let filters = allow_filters(prefixes, match_mode(state, segment));
    let allowed = filters.is_allowed(path);

    if json {
        let result = serde_json::json!({
            "path": path,
            "filters": filters,
            "allowed": allowed,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if filters.is_unrestricted() {
        println!(
            "  {} '{}' is allowed {}",
            check_mark(true),
            style(path).cyan(),
            style("(no prefixes given)").dim(),
        );
    } else {
        println!(
            "  {} '{}' is {}",
            check_mark(allowed),
            style(path).cyan(),
            if allowed { "allowed" } else { "not allowed" },
        );
    }

    Ok(())
}

/// Resolve a qualified path against the mounted namespaces.
pub fn route(state: &AppState, path: &str, json: bool) -> Result<()> {
    let (storage, backend_path) = state.router.resolve(path)?;

    if json {
        let result = serde_json::json!({
            "path": path,
            "storage": storage,
            "backend_path": backend_path,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "  {} -> {}",
            style(storage).cyan(),
            style(&backend_path).bold(),
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use filestorage_types::config::StorageConfig;

    use super::*;

    fn state(config: StorageConfig) -> AppState {
        AppState::with_config(PathBuf::from("/tmp/fstore-test"), config)
    }

    #[test]
    fn segment_flag_overrides_config() {
        let raw = state(StorageConfig::default());
        assert_eq!(match_mode(&raw, false), PrefixMatch::Raw);
        assert_eq!(match_mode(&raw, true), PrefixMatch::Segment);

        let segment = state(StorageConfig {
            prefix_match: PrefixMatch::Segment,
            ..Default::default()
        });
        assert_eq!(match_mode(&segment, false), PrefixMatch::Segment);
    }

    #[test]
    fn validate_all_reports_each_path() {
        let paths = vec!["/ok".to_string(), "rel".to_string(), "/a/".to_string()];
        let results = validate_all(&paths, 1024);
        assert_eq!(
            results,
            vec![
                ("/ok", Ok(())),
                ("rel", Err(PathError::Relative)),
                ("/a/", Err(PathError::EndsWithDelimiter)),
            ]
        );
    }

    #[test]
    fn validate_fails_when_any_path_is_invalid() {
        let state = state(StorageConfig::default());
        assert!(validate(&state, &["/fine".to_string()], true).is_ok());
        assert!(validate(&state, &["/fine".to_string(), "bad".to_string()], true).is_err());
    }

    #[test]
    fn empty_prefix_list_allows_everything() {
        let filters = allow_filters(Vec::new(), PrefixMatch::Segment);
        assert!(filters.is_unrestricted());
        assert!(filters.is_allowed("/anything"));
    }

    #[test]
    fn allow_filters_honour_mode() {
        let raw = allow_filters(vec!["/git".to_string()], PrefixMatch::Raw);
        assert!(raw.is_allowed("/github/x"));

        let segment = allow_filters(vec!["/git".to_string()], PrefixMatch::Segment);
        assert!(!segment.is_allowed("/github/x"));
        assert!(segment.is_allowed("/git/x"));
    }

    #[test]
    fn route_rejects_paths_outside_storage() {
        let state = state(StorageConfig::default());
        assert!(route(&state, "grafanads/dash/x", true).is_ok());
        assert!(route(&state, "/dash/x", true).is_err());
    }
}
