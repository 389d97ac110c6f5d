//! Shared domain types for hierarchical file storage.
//!
//! This crate contains the value types every storage backend speaks:
//! the path model and its validation, file metadata, listing pages,
//! path filters, configuration, and the associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod error;
pub mod file;
pub mod filter;
pub mod path;
pub mod validation;
