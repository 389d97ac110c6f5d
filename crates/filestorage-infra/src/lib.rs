//! Infrastructure layer for filestorage.
//!
//! Concrete `FileStorage` backends and configuration loading from the data
//! directory. Depends on `filestorage-core` for the trait definitions.

pub mod config;
pub mod storage;
