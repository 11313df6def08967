// Path: crates/api/src/storage/mod.rs

//! API for the ordered key-value backend underneath the observation stores.
//!
//! Keys and values are opaque byte strings. Ordering is lexicographic over
//! raw bytes, which the key codecs rely on for prefix scoping: every record
//! family lives under its own one-byte key-type tag, and sub-identity scans
//! are plain prefix scans over longer prefixes.

use thiserror::Error;

/// A single key-value entry yielded by a prefix scan.
pub type KvEntry = (Vec<u8>, Vec<u8>);

/// A prefix scan over the backend, yielding entries in lexicographic key
/// order. Dropping the iterator releases whatever resources (transactions,
/// cursors, locks) the backend acquired for the scan, on every exit path.
pub type PrefixIter = Box<dyn Iterator<Item = Result<KvEntry, StorageError>> + Send>;

/// Represents errors that can occur within the durable storage layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A generic error originating from the underlying key-value store backend (e.g., redb).
    #[error("backend error: {0}")]
    Backend(String),
    /// An error occurred while serializing data for storage.
    #[error("encode error: {0}")]
    Encode(String),
    /// An error occurred while deserializing data from storage.
    #[error("decode error: {0}")]
    Decode(String),
}

/// The contract for an ordered key-value backend with atomic single-key
/// operations.
///
/// There are no cross-key transactions: a put or delete is atomic on its own,
/// and a scan running concurrently with mutations provides at-least-once, not
/// exactly-once, enumeration of entries added or removed mid-scan.
///
/// Implementations must document their iteration semantics. Both backends
/// shipped in `lodesync-storage` materialize a point-in-time snapshot when
/// the iterator is constructed, so deleting the current key during iteration
/// is safe and never skips or repeats other keys of that same scan.
pub trait Backend: Send + Sync {
    /// Atomically stores `value` under `key`, replacing any previous value.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StorageError>;

    /// Returns the value stored under `key`, or `None` if absent.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError>;

    /// Atomically removes `key`. Removing an absent key is not an error.
    fn delete(&self, key: &[u8]) -> Result<(), StorageError>;

    /// Iterates all entries whose key starts with `prefix`, in lexicographic
    /// key order.
    fn iter_prefix(&self, prefix: &[u8]) -> Result<PrefixIter, StorageError>;
}
