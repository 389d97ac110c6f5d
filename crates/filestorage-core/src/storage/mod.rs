//! Storage abstractions.
//!
//! Defines the `FileStorage` operation contract and its object-safe
//! `BoxFileStorage` wrapper. Implementations live in filestorage-infra.

pub mod box_storage;
pub mod file_storage;

pub use box_storage::{BoxFileStorage, FileStorageDyn};
pub use file_storage::FileStorage;
