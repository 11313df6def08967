// Path: crates/observed/src/consolidate.rs

//! Pure merge of candidate-link records into consolidated views.
//!
//! Invoked once per enumeration call with the full set of decoded records;
//! no state is kept across calls. Every merge step is either an overwrite of
//! a uniquely-keyed slot or a set union, so the final map contents do not
//! depend on the order records are visited.

use lodesync_types::{DeviceId, ObservedCandidateLink};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A fully decoded candidate-link record together with the identities from
/// its storage key: "`introducer` says `folder_id` exists on `candidate`".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateLinkRecord {
    pub introducer: DeviceId,
    pub folder_id: String,
    pub candidate: DeviceId,
    pub observed: ObservedCandidateLink,
}

/// Consolidated information about a candidate device, enough to add a
/// connection to it.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CandidateDevice {
    /// Only meaningful if the device is not known locally.
    pub cert_name: String,
    /// Deduplicated addresses to try for contacting the device; order is
    /// unspecified.
    pub addresses: Vec<String>,
    pub introduced_by: HashMap<DeviceId, CandidateDeviceAttribution>,
}

/// Details which one introducer told us about a candidate device.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CandidateDeviceAttribution {
    /// When the introducer last attested to the candidate, in unix seconds.
    pub time: u64,
    /// Folder ID to the introducer's label for it, across every folder the
    /// introducer mentioned the candidate in.
    pub common_folders: HashMap<String, String>,
    /// Only meaningful if the device is not known locally.
    pub suggested_name: String,
}

/// Consolidated information about a candidate folder: candidate device to
/// introducer to that introducer's attestation.
pub type CandidateFolder = HashMap<DeviceId, HashMap<DeviceId, CandidateFolderAttribution>>;

/// Details which one introducer told us about a candidate folder.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct CandidateFolderAttribution {
    /// When the attestation was last observed, in unix seconds.
    pub time: u64,
    /// The introducer's label for the folder.
    pub label: String,
}

impl CandidateDevice {
    fn merge_link(&mut self, observed: &ObservedCandidateLink, folder_id: &str, introducer: DeviceId) {
        let attrib = self.introduced_by.entry(introducer).or_default();
        attrib.time = observed.time;
        attrib
            .common_folders
            .insert(folder_id.to_string(), observed.introducer_label.clone());
        if let Some(meta) = &observed.candidate_meta {
            self.cert_name = meta.cert_name.clone();
            attrib.suggested_name = meta.suggested_name.clone();
            self.collect_addresses(&meta.addresses);
        }
    }

    /// Union the given addresses into the running set, keyed on exact string
    /// equality.
    fn collect_addresses(&mut self, addresses: &[String]) {
        if addresses.is_empty() {
            return;
        }
        let mut set: HashSet<String> = self.addresses.drain(..).collect();
        set.extend(addresses.iter().cloned());
        self.addresses = set.into_iter().collect();
    }
}

/// Folds candidate-link records into one consolidated entry per candidate
/// device, across all introducers and folders.
pub fn consolidate_devices(
    records: impl IntoIterator<Item = CandidateLinkRecord>,
) -> HashMap<DeviceId, CandidateDevice> {
    let mut res: HashMap<DeviceId, CandidateDevice> = HashMap::new();
    for record in records {
        res.entry(record.candidate)
            .or_default()
            .merge_link(&record.observed, &record.folder_id, record.introducer);
    }
    res
}

/// Folds candidate-link records into one consolidated entry per folder,
/// keyed by candidate and then introducer.
pub fn consolidate_folders(
    records: impl IntoIterator<Item = CandidateLinkRecord>,
) -> HashMap<String, CandidateFolder> {
    let mut res: HashMap<String, CandidateFolder> = HashMap::new();
    for record in records {
        res.entry(record.folder_id)
            .or_default()
            .entry(record.candidate)
            .or_default()
            .insert(
                record.introducer,
                CandidateFolderAttribution {
                    time: record.observed.time,
                    label: record.observed.introducer_label,
                },
            );
    }
    res
}
