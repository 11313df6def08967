// Path: crates/observed/src/lib.rs
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

//! # Lodesync Observed-Entity Store
//!
//! Durably records unsolicited claims made by remote peers — "device D wants
//! to connect", "device D offers folder F", "introducer I says candidate C
//! participates in folder F" — and consolidates them into the queryable views
//! that drive accept/reject decisions and automatic device introduction.
//!
//! Records are soft, reconstructible hints: anything that fails to decode is
//! deleted during the very read that discovered it, since the originating
//! peer will re-announce if still relevant. Enumeration operations therefore
//! mutate the backend as a side effect.

/// Pure merge of candidate-link records into consolidated views.
pub mod consolidate;
/// Key codecs for the three observed-entity families.
pub mod keys;
/// The store operations layer.
pub mod store;

pub use consolidate::{
    CandidateDevice, CandidateDeviceAttribution, CandidateFolder, CandidateFolderAttribution,
    CandidateLinkRecord,
};
pub use store::{ObservedStore, PendingFolder};

#[cfg(test)]
mod tests;
