// Path: crates/types/src/lib.rs
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

//! # Lodesync Types
//!
//! Core data structures shared across the Lodesync daemon: the stable device
//! identity, the observation record types persisted by the observed-entity
//! store, and the canonical binary codec used for every stored value.

/// The canonical, deterministic binary codec for persisted records.
pub mod codec;
/// The fixed-width device identity and its string form.
pub mod device_id;
/// Observation records persisted for pending and candidate entities.
pub mod observed;

pub use device_id::DeviceId;
pub use observed::{
    IntroducedDeviceDetails, ObservedCandidateLink, ObservedDevice, ObservedFolder,
};
