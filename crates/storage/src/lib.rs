// Path: crates/storage/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! Ordered key-value backends for the Lodesync daemon.
//!
//! Two implementations of the `lodesync_api::storage::Backend` contract: a
//! durable one on top of `redb`, and an in-memory one for diskless operation
//! and tests. Both yield prefix scans over a point-in-time snapshot, so
//! callers may delete the entry they are currently visiting without
//! disturbing the remainder of the scan.

/// The ephemeral, in-memory backend.
pub mod memory;
/// The durable backend on top of `redb`.
pub mod redb_store;

pub use memory::MemoryBackend;
pub use redb_store::RedbBackend;
