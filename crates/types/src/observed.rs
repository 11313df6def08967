// Path: crates/types/src/observed.rs

//! Observation records persisted by the observed-entity store.
//!
//! Each record is the value half of a storage entry; the identities it is
//! about (device, folder, introducer) live in the key, not here. All
//! timestamps are unix seconds — observations are stamped at one-second
//! resolution to avoid sub-second churn across repeated announcements.

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// A remote device that announced itself without being configured locally.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ObservedDevice {
    /// When the announcement was last observed, in unix seconds.
    pub time: u64,
    /// The name the device reported for itself.
    pub name: String,
    /// The best-known network address of the device.
    pub address: String,
}

/// A folder a remote device offered to share with us.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ObservedFolder {
    /// When the offer was last observed, in unix seconds.
    pub time: u64,
    /// The label the offering device uses for the folder.
    pub label: String,
}

/// Connection metadata an introducer attached to a candidate device.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IntroducedDeviceDetails {
    /// The certificate name the candidate presents.
    pub cert_name: String,
    /// Network addresses the candidate is said to be reachable at.
    pub addresses: Vec<String>,
    /// A display name the introducer suggests for the candidate.
    pub suggested_name: String,
}

/// One introducer's attestation that a candidate device participates in a
/// folder. Keyed in storage by the (introducer, folder, candidate) triple; a
/// fresher attestation for the same triple replaces the old one outright.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ObservedCandidateLink {
    /// When the attestation was last observed, in unix seconds.
    pub time: u64,
    /// The introducer's label for the folder.
    pub introducer_label: String,
    /// Optional connection metadata for the candidate.
    pub candidate_meta: Option<IntroducedDeviceDetails>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;

    #[test]
    fn records_roundtrip_with_empty_fields() {
        let device = ObservedDevice {
            time: 0,
            name: String::new(),
            address: String::new(),
        };
        let bs = codec::to_bytes_canonical(&device).unwrap();
        assert_eq!(device, codec::from_bytes_canonical(&bs).unwrap());

        let folder = ObservedFolder {
            time: 1_650_000_000,
            label: String::new(),
        };
        let bs = codec::to_bytes_canonical(&folder).unwrap();
        assert_eq!(folder, codec::from_bytes_canonical(&bs).unwrap());

        let link = ObservedCandidateLink {
            time: 1_650_000_000,
            introducer_label: String::new(),
            candidate_meta: None,
        };
        let bs = codec::to_bytes_canonical(&link).unwrap();
        assert_eq!(link, codec::from_bytes_canonical(&bs).unwrap());
    }

    #[test]
    fn link_roundtrips_with_metadata() {
        let link = ObservedCandidateLink {
            time: 1_650_000_000,
            introducer_label: "Family pics".to_string(),
            candidate_meta: Some(IntroducedDeviceDetails {
                cert_name: String::new(),
                addresses: vec![
                    "tcp://192.0.2.7:22000".to_string(),
                    "quic://[2001:db8::7]:22000".to_string(),
                ],
                suggested_name: "Jane's laptop".to_string(),
            }),
        };
        let bs = codec::to_bytes_canonical(&link).unwrap();
        assert_eq!(link, codec::from_bytes_canonical(&bs).unwrap());
    }

    #[test]
    fn garbage_does_not_decode() {
        assert!(codec::from_bytes_canonical::<ObservedDevice>(b"garbage").is_err());
        assert!(codec::from_bytes_canonical::<ObservedCandidateLink>(&[0xff; 3]).is_err());
    }
}
