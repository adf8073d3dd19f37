//! Device reports returned by the service.
//!
//! These are the responses that correct the local device directory: a
//! message submission that missed or over-targeted devices is answered with
//! [`MismatchedDevices`] (HTTP 409) or [`StaleDevices`] (HTTP 410), and the
//! account's own linked devices come back as [`LinkedDevices`].

use serde::{Deserialize, Serialize};

use crate::ProtoError;

/// Devices the submission should have included, and devices that no longer
/// exist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MismatchedDevices {
    /// Devices the service knows about that the submission missed.
    #[serde(default)]
    pub missing_devices: Vec<u32>,
    /// Devices the submission targeted that the service does not know.
    #[serde(default)]
    pub extra_devices: Vec<u32>,
}

impl MismatchedDevices {
    /// Decode a 409 response body.
    pub fn from_json(body: &[u8]) -> Result<Self, ProtoError> {
        Ok(serde_json::from_slice(body)?)
    }
}

/// Devices whose sessions must be rebuilt before retrying.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaleDevices {
    /// Devices with stale sessions.
    #[serde(default)]
    pub stale_devices: Vec<u32>,
}

impl StaleDevices {
    /// Decode a 410 response body.
    pub fn from_json(body: &[u8]) -> Result<Self, ProtoError> {
        Ok(serde_json::from_slice(body)?)
    }
}

/// One device linked to the local account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedDevice {
    /// Device id.
    pub id: u32,
    /// Encrypted device name, when the device set one.
    #[serde(default)]
    pub name: Option<String>,
    /// Link time, milliseconds since the Unix epoch.
    #[serde(default)]
    pub created: u64,
    /// Last time the device talked to the service, milliseconds since the
    /// Unix epoch.
    #[serde(default)]
    pub last_seen: u64,
}

/// Response to the device list request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedDevices {
    /// Linked devices, primary included.
    #[serde(default)]
    pub devices: Vec<LinkedDevice>,
}

impl LinkedDevices {
    /// Decode a device list response body.
    pub fn from_json(body: &[u8]) -> Result<Self, ProtoError> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Device ids in response order.
    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.devices.iter().map(|d| d.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_devices_missing_fields_default() {
        let report = MismatchedDevices::from_json(br#"{"missingDevices":[2,3]}"#).unwrap();
        assert_eq!(report.missing_devices, vec![2, 3]);
        assert!(report.extra_devices.is_empty());
    }

    #[test]
    fn stale_devices_decode() {
        let report = StaleDevices::from_json(br#"{"staleDevices":[4]}"#).unwrap();
        assert_eq!(report.stale_devices, vec![4]);
    }

    #[test]
    fn linked_devices_decode() {
        let body = br#"{"devices":[
            {"id":1,"name":null,"created":10,"lastSeen":20},
            {"id":3,"name":"bGFwdG9w","created":30,"lastSeen":40}
        ]}"#;
        let devices = LinkedDevices::from_json(body).unwrap();
        assert_eq!(devices.ids().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(devices.devices[1].name.as_deref(), Some("bGFwdG9w"));
        assert_eq!(devices.devices[1].last_seen, 40);
    }

    #[test]
    fn malformed_body_is_json_error() {
        assert!(matches!(
            LinkedDevices::from_json(b"{\"devices\": 5}"),
            Err(ProtoError::Json { .. })
        ));
    }
}
