// Path: crates/observed/src/keys.rs

//! Key codecs for the observed-entity families.
//!
//! Every key starts with a one-byte key-type tag, so a prefix scan over a
//! single tag enumerates exactly one family. Within a key, the "outer"
//! identity comes first: pending-folder keys lead with the offering device so
//! a device-scoped enumeration is a sub-prefix scan, and candidate-link keys
//! lead with the introducer. Device identities are fixed-width, which leaves
//! the variable-width folder component recoverable as the remainder.
//!
//! Decoding never reads beyond the slice and returns `None` on truncated or
//! mistagged input instead of panicking.

use lodesync_types::DeviceId;

/// Key-type tag for pending device announcements.
pub const KEY_TYPE_PENDING_DEVICE: u8 = 0x01;
/// Key-type tag for pending folder offers.
pub const KEY_TYPE_PENDING_FOLDER: u8 = 0x02;
/// Key-type tag for candidate-link attestations.
pub const KEY_TYPE_CANDIDATE_LINK: u8 = 0x03;

const ID_LEN: usize = DeviceId::LENGTH;

/// `tag ‖ device(32)`
pub fn pending_device_key(device: &DeviceId) -> Vec<u8> {
    [&[KEY_TYPE_PENDING_DEVICE][..], device.as_ref()].concat()
}

pub fn device_from_pending_device_key(key: &[u8]) -> Option<DeviceId> {
    if key.len() != 1 + ID_LEN || key.first() != Some(&KEY_TYPE_PENDING_DEVICE) {
        return None;
    }
    key.get(1..).and_then(|raw| DeviceId::try_from(raw).ok())
}

/// `tag ‖ device(32) ‖ folder(rest)`
pub fn pending_folder_key(device: &DeviceId, folder: &[u8]) -> Vec<u8> {
    [&[KEY_TYPE_PENDING_FOLDER][..], device.as_ref(), folder].concat()
}

/// The sub-prefix covering every pending-folder entry offered by `device`.
pub fn pending_folder_prefix(device: &DeviceId) -> Vec<u8> {
    [&[KEY_TYPE_PENDING_FOLDER][..], device.as_ref()].concat()
}

pub fn device_from_pending_folder_key(key: &[u8]) -> Option<DeviceId> {
    if key.first() != Some(&KEY_TYPE_PENDING_FOLDER) {
        return None;
    }
    key.get(1..1 + ID_LEN)
        .and_then(|raw| DeviceId::try_from(raw).ok())
}

/// The folder component may legitimately decode to an empty slice from a
/// garbled key; callers treat empty as invalid.
pub fn folder_from_pending_folder_key(key: &[u8]) -> Option<&[u8]> {
    if key.first() != Some(&KEY_TYPE_PENDING_FOLDER) {
        return None;
    }
    key.get(1 + ID_LEN..)
}

const CANDIDATE_LINK_MIN_LEN: usize = 1 + 2 * ID_LEN;

/// `tag ‖ introducer(32) ‖ folder(variable) ‖ candidate(32)`
pub fn candidate_link_key(introducer: &DeviceId, folder: &[u8], candidate: &DeviceId) -> Vec<u8> {
    [
        &[KEY_TYPE_CANDIDATE_LINK][..],
        introducer.as_ref(),
        folder,
        candidate.as_ref(),
    ]
    .concat()
}

pub fn introducer_from_candidate_link_key(key: &[u8]) -> Option<DeviceId> {
    if key.len() < CANDIDATE_LINK_MIN_LEN || key.first() != Some(&KEY_TYPE_CANDIDATE_LINK) {
        return None;
    }
    key.get(1..1 + ID_LEN)
        .and_then(|raw| DeviceId::try_from(raw).ok())
}

/// See `folder_from_pending_folder_key` on empty results.
pub fn folder_from_candidate_link_key(key: &[u8]) -> Option<&[u8]> {
    if key.len() < CANDIDATE_LINK_MIN_LEN || key.first() != Some(&KEY_TYPE_CANDIDATE_LINK) {
        return None;
    }
    key.get(1 + ID_LEN..key.len() - ID_LEN)
}

pub fn candidate_from_candidate_link_key(key: &[u8]) -> Option<DeviceId> {
    if key.len() < CANDIDATE_LINK_MIN_LEN || key.first() != Some(&KEY_TYPE_CANDIDATE_LINK) {
        return None;
    }
    key.get(key.len() - ID_LEN..)
        .and_then(|raw| DeviceId::try_from(raw).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(fill: u8) -> DeviceId {
        DeviceId([fill; 32])
    }

    #[test]
    fn pending_device_key_roundtrips() {
        let id = device(0xab);
        let key = pending_device_key(&id);
        assert_eq!(key.len(), 33);
        assert_eq!(key[0], KEY_TYPE_PENDING_DEVICE);
        assert_eq!(device_from_pending_device_key(&key), Some(id));
    }

    #[test]
    fn pending_folder_key_roundtrips() {
        let id = device(0x17);
        let key = pending_folder_key(&id, b"photos");
        assert_eq!(device_from_pending_folder_key(&key), Some(id));
        assert_eq!(folder_from_pending_folder_key(&key), Some(&b"photos"[..]));
    }

    #[test]
    fn pending_folder_prefix_scopes_the_device() {
        let id = device(0x17);
        let key = pending_folder_key(&id, b"photos");
        let prefix = pending_folder_prefix(&id);
        assert!(key.starts_with(&prefix));
        // Another device's prefix must not match.
        assert!(!key.starts_with(&pending_folder_prefix(&device(0x18))));
    }

    #[test]
    fn candidate_link_key_roundtrips() {
        let introducer = device(0x01);
        let candidate = device(0x02);
        let key = candidate_link_key(&introducer, b"music", &candidate);
        assert_eq!(introducer_from_candidate_link_key(&key), Some(introducer));
        assert_eq!(folder_from_candidate_link_key(&key), Some(&b"music"[..]));
        assert_eq!(candidate_from_candidate_link_key(&key), Some(candidate));
    }

    #[test]
    fn candidate_link_key_with_empty_folder_decodes_as_empty() {
        let key = candidate_link_key(&device(1), b"", &device(2));
        assert_eq!(folder_from_candidate_link_key(&key), Some(&b""[..]));
    }

    #[test]
    fn truncated_keys_decode_to_none() {
        let id = device(0x33);
        let mut key = pending_device_key(&id);
        key.pop();
        assert_eq!(device_from_pending_device_key(&key), None);

        let short = [KEY_TYPE_PENDING_FOLDER; 10];
        assert_eq!(device_from_pending_folder_key(&short), None);
        assert_eq!(folder_from_pending_folder_key(&short), None);

        let mut link = candidate_link_key(&device(1), b"", &device(2));
        link.pop();
        assert_eq!(introducer_from_candidate_link_key(&link), None);
        assert_eq!(folder_from_candidate_link_key(&link), None);
        assert_eq!(candidate_from_candidate_link_key(&link), None);

        assert_eq!(device_from_pending_device_key(&[]), None);
        assert_eq!(folder_from_candidate_link_key(&[]), None);
    }

    #[test]
    fn mistagged_keys_decode_to_none() {
        let key = pending_device_key(&device(0x44));
        assert_eq!(device_from_pending_folder_key(&key), None);
        assert_eq!(folder_from_pending_folder_key(&key), None);
    }
}
