//! File storage contract and routing for hierarchical, path-addressed storage.
//!
//! This crate defines the "port" (the `FileStorage` trait) that backends in
//! the infrastructure layer implement, plus the pieces callers need to stay
//! polymorphic over them: `BoxFileStorage`, the cancellable `StorageContext`
//! and the namespace `StorageRouter`. It depends only on `filestorage-types`
//! -- never on `filestorage-infra` or any IO crate.

pub mod context;
pub mod router;
pub mod storage;

pub use context::StorageContext;
pub use router::StorageRouter;
pub use storage::{BoxFileStorage, FileStorage};
