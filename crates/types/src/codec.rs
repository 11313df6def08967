// Path: crates/types/src/codec.rs

//! Defines the canonical, deterministic binary codec for all persisted records.
//!
//! This module provides simple wrappers around `parity-scale-codec` (SCALE).
//! By centralizing the codec logic here in the base `types` crate, we ensure
//! that every component reads and writes the exact same serialization format,
//! and that a value written by one version of the daemon decodes bit-exactly
//! in another.
//!
//! Decoding uses `decode_all`, which rejects trailing bytes. Truncated,
//! over-long, and structurally invalid payloads therefore all fail with a
//! descriptive error rather than being silently accepted — the observed-entity
//! store's self-repair policy depends on this.

use parity_scale_codec::{Decode, DecodeAll, Encode};

/// Encodes a value into a deterministic, canonical byte representation.
pub fn to_bytes_canonical<T: Encode>(v: &T) -> Result<Vec<u8>, String> {
    Ok(v.encode())
}

/// Decodes a value from its canonical byte representation.
///
/// Fails fast on any decoding error, returning a descriptive string. The
/// input must be consumed exactly; leftover bytes are an error.
pub fn from_bytes_canonical<T: Decode>(b: &[u8]) -> Result<T, String> {
    T::decode_all(&mut &*b).map_err(|e| format!("canonical decode failed: {}", e))
}
