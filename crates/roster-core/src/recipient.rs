//! Recipient identifiers and records.

use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{DeviceId, DeviceSet, DirectoryError, WriteTransaction, codec};

/// An empty string is not a recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("recipient id must not be empty")]
pub struct InvalidRecipientId;

/// Opaque, stable identifier of a recipient (phone number or service id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecipientId(String);

impl RecipientId {
    /// Validate a recipient id.
    pub fn new(id: impl Into<String>) -> Result<Self, InvalidRecipientId> {
        let id = id.into();
        if id.is_empty() {
            return Err(InvalidRecipientId);
        }
        Ok(Self(id))
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RecipientId {
    type Error = InvalidRecipientId;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<RecipientId> for String {
    fn from(id: RecipientId) -> Self {
        id.0
    }
}

impl FromStr for RecipientId {
    type Err = InvalidRecipientId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for RecipientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecipientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A recipient and the devices it has linked.
///
/// A record value may be *unsaved*: built in memory, with no persisted
/// counterpart. Only a persisted record means "registered". Device mutation
/// goes through the store and is refused for unsaved records.
///
/// Equality and ordering look at the recipient id only. Two values for the
/// same recipient are equal even if one of them holds a stale device set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipientRecord {
    recipient_id: RecipientId,
    devices: DeviceSet,
}

impl RecipientRecord {
    /// Unsaved record with no devices.
    pub fn new(recipient_id: RecipientId) -> Self {
        Self { recipient_id, devices: DeviceSet::new() }
    }

    /// Unsaved record with the given devices.
    pub fn with_devices(recipient_id: RecipientId, devices: DeviceSet) -> Self {
        Self { recipient_id, devices }
    }

    /// Recipient id.
    pub fn recipient_id(&self) -> &RecipientId {
        &self.recipient_id
    }

    /// Devices as last read from or written to the store.
    pub fn devices(&self) -> &DeviceSet {
        &self.devices
    }

    /// Persist this record, replacing any stored value for the same id.
    pub fn save(&self, txn: &mut impl WriteTransaction) -> Result<(), DirectoryError> {
        codec::store(txn, self)?;
        debug!(recipient = %self.recipient_id, devices = %self.devices, "saved recipient");
        Ok(())
    }

    /// Union `ids` into the device set and persist.
    ///
    /// The change is applied to the persisted record visible in `txn`, so a
    /// stale in-memory value cannot drop devices another writer added. On
    /// success `self` holds the resulting device set.
    ///
    /// # Errors
    ///
    /// - `DirectoryError::NotRegistered` if no record is persisted for this id
    /// - `DirectoryError::Store` if the store fails
    pub fn add_devices(
        &mut self,
        ids: impl IntoIterator<Item = DeviceId>,
        txn: &mut impl WriteTransaction,
    ) -> Result<(), DirectoryError> {
        let added = self.update_devices(txn, |devices| devices.union_with(ids))?;
        debug!(recipient = %self.recipient_id, added, devices = %self.devices, "added devices");
        Ok(())
    }

    /// Subtract `ids` from the device set and persist.
    ///
    /// Removing the last device leaves a registered record with no devices.
    ///
    /// # Errors
    ///
    /// Same as [`RecipientRecord::add_devices`].
    pub fn remove_devices(
        &mut self,
        ids: impl IntoIterator<Item = DeviceId>,
        txn: &mut impl WriteTransaction,
    ) -> Result<(), DirectoryError> {
        let removed = self.update_devices(txn, |devices| devices.subtract(ids))?;
        debug!(recipient = %self.recipient_id, removed, devices = %self.devices, "removed devices");
        Ok(())
    }

    /// Total order by recipient id. Devices are ignored.
    pub fn compare(&self, other: &Self) -> Ordering {
        self.recipient_id.cmp(&other.recipient_id)
    }

    fn update_devices(
        &mut self,
        txn: &mut impl WriteTransaction,
        change: impl FnOnce(&mut DeviceSet) -> usize,
    ) -> Result<usize, DirectoryError> {
        let Some(mut persisted) = codec::load(txn, &self.recipient_id)? else {
            warn!(recipient = %self.recipient_id, "device mutation on unsaved recipient");
            return Err(DirectoryError::NotRegistered { recipient_id: self.recipient_id.clone() });
        };

        let changed = change(&mut persisted.devices);
        if changed > 0 {
            codec::store(txn, &persisted)?;
        }

        self.devices = persisted.devices;
        Ok(changed)
    }
}

impl PartialEq for RecipientRecord {
    fn eq(&self, other: &Self) -> bool {
        self.recipient_id == other.recipient_id
    }
}

impl Eq for RecipientRecord {}

impl PartialOrd for RecipientRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RecipientRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}
