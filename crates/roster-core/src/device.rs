//! Device identifiers and insertion-ordered device sets.

use std::{fmt, iter::Copied, num::NonZeroU32};

use indexmap::{IndexSet, set::Iter};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Device id zero is not a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("device id must be positive")]
pub struct InvalidDeviceId;

/// A positive device identifier.
///
/// Device 1 is the primary device of an account; linked devices get higher
/// ids assigned by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct DeviceId(NonZeroU32);

impl DeviceId {
    /// The primary device.
    pub const PRIMARY: Self = Self(NonZeroU32::MIN);

    /// Validate a raw device id.
    pub fn new(raw: u32) -> Result<Self, InvalidDeviceId> {
        NonZeroU32::new(raw).map(Self).ok_or(InvalidDeviceId)
    }

    /// Raw value.
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<u32> for DeviceId {
    type Error = InvalidDeviceId;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<DeviceId> for u32 {
    fn from(id: DeviceId) -> Self {
        id.get()
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Set of device ids that remembers insertion order.
///
/// Iteration order is deterministic (first insertion wins) but carries no
/// meaning: no device is more canonical than another. Removal keeps the
/// relative order of the survivors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceSet(IndexSet<DeviceId>);

impl DeviceSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert every id in `ids`. Returns how many were not already present.
    pub fn union_with(&mut self, ids: impl IntoIterator<Item = DeviceId>) -> usize {
        ids.into_iter().filter(|id| self.0.insert(*id)).count()
    }

    /// Remove every id in `ids`. Returns how many were present.
    pub fn subtract(&mut self, ids: impl IntoIterator<Item = DeviceId>) -> usize {
        ids.into_iter().filter(|id| self.0.shift_remove(id)).count()
    }

    /// Whether `id` is in the set.
    pub fn contains(&self, id: DeviceId) -> bool {
        self.0.contains(&id)
    }

    /// Number of devices.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Devices in insertion order.
    pub fn iter(&self) -> Copied<Iter<'_, DeviceId>> {
        self.0.iter().copied()
    }

    /// Devices in insertion order, as a vector.
    pub fn to_vec(&self) -> Vec<DeviceId> {
        self.iter().collect()
    }
}

impl FromIterator<DeviceId> for DeviceSet {
    fn from_iter<I: IntoIterator<Item = DeviceId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a DeviceSet {
    type Item = DeviceId;
    type IntoIter = Copied<Iter<'a, DeviceId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for DeviceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, id) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{id}")?;
        }
        f.write_str("}")
    }
}
