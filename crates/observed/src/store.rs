// Path: crates/observed/src/store.rs

//! The observed-entity store operations layer.
//!
//! One add-or-update / remove / enumerate triad per entity family, built
//! directly on the key codecs, the canonical record codec, and the backend's
//! atomic single-key primitives. Enumerations apply read-time self-repair:
//! entries that fail to decode are deleted on the spot, because pending and
//! candidate records are soft hints the network will re-send if still
//! relevant. A hard backend error — including one raised by the repair
//! delete itself — aborts the enumeration and is propagated.

use crate::consolidate::{
    consolidate_devices, consolidate_folders, CandidateDevice, CandidateFolder,
    CandidateLinkRecord,
};
use crate::keys;
use lodesync_api::storage::{Backend, StorageError};
use lodesync_types::codec;
use lodesync_types::{DeviceId, IntroducedDeviceDetails, ObservedCandidateLink, ObservedDevice, ObservedFolder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// Consolidated information about a pending folder: which devices offered it
/// and what they said about it.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PendingFolder {
    pub offered_by: HashMap<DeviceId, ObservedFolder>,
}

/// The observed-entity store, generic over the ordered key-value backend.
///
/// Provides no locking of its own; concurrent mutators and enumerators rely
/// on the backend's per-key atomicity and snapshot iteration semantics.
pub struct ObservedStore<B> {
    backend: B,
}

impl<B: Backend> ObservedStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Direct access to the underlying backend, e.g. for assertions on
    /// repair side effects.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Observation timestamp, rounded to one-second resolution.
    fn now_unix() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default()
    }

    pub fn add_or_update_pending_device(
        &self,
        device: &DeviceId,
        name: &str,
        address: &str,
    ) -> Result<(), StorageError> {
        let key = keys::pending_device_key(device);
        let record = ObservedDevice {
            time: Self::now_unix(),
            name: name.to_string(),
            address: address.to_string(),
        };
        let bs = codec::to_bytes_canonical(&record).map_err(StorageError::Encode)?;
        self.backend.put(&key, &bs)
    }

    /// Best-effort removal of a bookkeeping record; failure is logged, never
    /// propagated, so it cannot block the caller's larger operation.
    pub fn remove_pending_device(&self, device: &DeviceId) {
        let key = keys::pending_device_key(device);
        if let Err(e) = self.backend.delete(&key) {
            tracing::warn!(target: "observed", device = %device, error = %e, "failed to remove pending device entry");
        }
    }

    /// Enumerates all pending device entries. Invalid ones are dropped from
    /// the database as a side effect.
    pub fn pending_devices(&self) -> Result<HashMap<DeviceId, ObservedDevice>, StorageError> {
        let mut res = HashMap::new();
        for entry in self.backend.iter_prefix(&[keys::KEY_TYPE_PENDING_DEVICE])? {
            let (key, value) = entry?;
            match Self::decode_pending_device(&key, &value) {
                Some((device, record)) => {
                    res.insert(device, record);
                }
                None => {
                    // Deleting invalid entries is the only possible repair
                    // measure and appropriate for the importance of pending
                    // entries. They will come back soon if still relevant.
                    tracing::info!(target: "observed", key = %hex::encode(&key), "invalid pending device entry, deleting from database");
                    self.backend.delete(&key)?;
                }
            }
        }
        Ok(res)
    }

    fn decode_pending_device(key: &[u8], value: &[u8]) -> Option<(DeviceId, ObservedDevice)> {
        let device = keys::device_from_pending_device_key(key)?;
        let record = codec::from_bytes_canonical(value).ok()?;
        Some((device, record))
    }

    pub fn add_or_update_pending_folder(
        &self,
        folder_id: &str,
        label: &str,
        device: &DeviceId,
    ) -> Result<(), StorageError> {
        if folder_id.is_empty() {
            return Err(StorageError::Encode("empty folder ID".to_string()));
        }
        let key = keys::pending_folder_key(device, folder_id.as_bytes());
        let record = ObservedFolder {
            time: Self::now_unix(),
            label: label.to_string(),
        };
        let bs = codec::to_bytes_canonical(&record).map_err(StorageError::Encode)?;
        self.backend.put(&key, &bs)
    }

    /// Removes the entry for one specific folder / device combination.
    pub fn remove_pending_folder_for_device(&self, folder_id: &str, device: &DeviceId) {
        let key = keys::pending_folder_key(device, folder_id.as_bytes());
        if let Err(e) = self.backend.delete(&key) {
            tracing::warn!(target: "observed", folder = folder_id, device = %device, error = %e, "failed to remove pending folder entry");
        }
    }

    /// Removes all entries matching a specific folder ID, regardless of which
    /// device offered it. Used e.g. when the folder is added locally and any
    /// outstanding offers for it become moot.
    pub fn remove_pending_folder(&self, folder_id: &str) {
        let iter = match self.backend.iter_prefix(&[keys::KEY_TYPE_PENDING_FOLDER]) {
            Ok(iter) => iter,
            Err(e) => {
                tracing::info!(target: "observed", error = %e, "could not iterate through pending folder entries");
                return;
            }
        };
        for entry in iter {
            let (key, _) = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::info!(target: "observed", error = %e, "could not iterate through pending folder entries");
                    return;
                }
            };
            if keys::folder_from_pending_folder_key(&key) != Some(folder_id.as_bytes()) {
                continue;
            }
            if let Err(e) = self.backend.delete(&key) {
                tracing::warn!(target: "observed", key = %hex::encode(&key), error = %e, "failed to remove pending folder entry");
            }
        }
    }

    /// Enumerates pending folder offers from all devices.
    pub fn pending_folders(&self) -> Result<HashMap<String, PendingFolder>, StorageError> {
        self.pending_folders_for_device(None)
    }

    /// Enumerates pending folder offers, restricted to one offering device
    /// when given. The restriction narrows the scan to the device's key
    /// sub-prefix instead of filtering the whole family. Invalid entries are
    /// dropped from the database as a side effect.
    pub fn pending_folders_for_device(
        &self,
        device: Option<&DeviceId>,
    ) -> Result<HashMap<String, PendingFolder>, StorageError> {
        let prefix = match device {
            Some(device) => keys::pending_folder_prefix(device),
            None => vec![keys::KEY_TYPE_PENDING_FOLDER],
        };
        let mut res: HashMap<String, PendingFolder> = HashMap::new();
        for entry in self.backend.iter_prefix(&prefix)? {
            let (key, value) = entry?;
            match Self::decode_pending_folder(&key, &value) {
                Some((device, folder_id, record)) => {
                    res.entry(folder_id)
                        .or_default()
                        .offered_by
                        .insert(device, record);
                }
                None => {
                    tracing::info!(target: "observed", key = %hex::encode(&key), "invalid pending folder entry, deleting from database");
                    self.backend.delete(&key)?;
                }
            }
        }
        Ok(res)
    }

    fn decode_pending_folder(key: &[u8], value: &[u8]) -> Option<(DeviceId, String, ObservedFolder)> {
        let device = keys::device_from_pending_folder_key(key)?;
        let folder = keys::folder_from_pending_folder_key(key)?;
        if folder.is_empty() {
            return None;
        }
        let folder_id = String::from_utf8(folder.to_vec()).ok()?;
        let record = codec::from_bytes_canonical(value).ok()?;
        Some((device, folder_id, record))
    }

    pub fn add_or_update_candidate_link(
        &self,
        folder_id: &str,
        introducer_label: &str,
        candidate: &DeviceId,
        introducer: &DeviceId,
        details: Option<IntroducedDeviceDetails>,
    ) -> Result<(), StorageError> {
        if folder_id.is_empty() {
            return Err(StorageError::Encode("empty folder ID".to_string()));
        }
        let key = keys::candidate_link_key(introducer, folder_id.as_bytes(), candidate);
        let record = ObservedCandidateLink {
            time: Self::now_unix(),
            introducer_label: introducer_label.to_string(),
            candidate_meta: details,
        };
        let bs = codec::to_bytes_canonical(&record).map_err(StorageError::Encode)?;
        self.backend.put(&key, &bs)
    }

    /// Consolidated view of all attestations, per candidate device. Invalid
    /// entries are dropped from the database as a side effect.
    pub fn candidate_devices(&self) -> Result<HashMap<DeviceId, CandidateDevice>, StorageError> {
        Ok(consolidate_devices(self.candidate_link_records()?))
    }

    /// Consolidated view of all attestations, per folder. Invalid entries
    /// are dropped from the database as a side effect.
    pub fn candidate_folders(&self) -> Result<HashMap<String, CandidateFolder>, StorageError> {
        Ok(consolidate_folders(self.candidate_link_records()?))
    }

    fn candidate_link_records(&self) -> Result<Vec<CandidateLinkRecord>, StorageError> {
        let mut records = Vec::new();
        for entry in self.backend.iter_prefix(&[keys::KEY_TYPE_CANDIDATE_LINK])? {
            let (key, value) = entry?;
            match Self::decode_candidate_link(&key, &value) {
                Ok(record) => records.push(record),
                Err(cause) => {
                    tracing::info!(target: "observed", key = %hex::encode(&key), cause, "invalid candidate link entry, deleting from database");
                    self.backend.delete(&key)?;
                }
            }
        }
        Ok(records)
    }

    /// Each failure point is reported separately so the log shows what kind
    /// of corruption was found.
    fn decode_candidate_link(key: &[u8], value: &[u8]) -> Result<CandidateLinkRecord, &'static str> {
        let Some(introducer) = keys::introducer_from_candidate_link_key(key) else {
            return Err("invalid introducer device ID");
        };
        let folder_id = keys::folder_from_candidate_link_key(key)
            .filter(|f| !f.is_empty())
            .and_then(|f| String::from_utf8(f.to_vec()).ok())
            .ok_or("invalid folder ID")?;
        let Some(candidate) = keys::candidate_from_candidate_link_key(key) else {
            return Err("invalid candidate device ID");
        };
        let observed: ObservedCandidateLink =
            codec::from_bytes_canonical(value).map_err(|_| "undecodable record")?;
        Ok(CandidateLinkRecord {
            introducer,
            folder_id,
            candidate,
            observed,
        })
    }
}
