// Path: crates/api/src/lib.rs
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

//! # Lodesync API
//!
//! Core traits and error types shared across the Lodesync daemon. Heavier
//! crates implement these contracts; consumers depend only on this crate to
//! stay decoupled from concrete backends.

/// The ordered key-value backend contract and its error taxonomy.
pub mod storage;
