//! Operations for model-based testing.
//!
//! Operations are generated by proptest, by the fuzzer, or from a seed, and
//! applied to both the model and the real directory. Recipients and devices
//! are small slots so random sequences hit the same records often.

use arbitrary::{Arbitrary, Unstructured};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Recipient slot. Only [`RECIPIENT_SLOTS`] distinct recipients exist.
pub type RecipientSlot = u8;

/// Device slot. Only [`DEVICE_SLOTS`] distinct devices exist.
pub type DeviceSlot = u8;

/// Number of distinct recipients.
pub const RECIPIENT_SLOTS: u8 = 6;

/// Number of distinct devices.
pub const DEVICE_SLOTS: u8 = 6;

/// Slot 0 is the local account; the world runs on its primary device.
pub const SELF_SLOT: RecipientSlot = 0;

/// Recipient id for a slot. Zero-padded so string order matches slot order.
pub fn recipient_name(slot: RecipientSlot) -> String {
    format!("+1555000{:04}", slot % RECIPIENT_SLOTS)
}

/// Device id for a slot. Never zero.
pub fn device_number(slot: DeviceSlot) -> u32 {
    u32::from(slot % DEVICE_SLOTS) + 1
}

/// Operations that can be applied to the directory.
#[derive(Debug, Clone, Arbitrary)]
pub enum Operation {
    /// Mark the recipient registered.
    Register {
        /// Target recipient.
        recipient: RecipientSlot,
    },

    /// Mark the recipient registered with a device.
    RegisterWithDevice {
        /// Target recipient.
        recipient: RecipientSlot,
        /// Device to ensure.
        device: DeviceSlot,
    },

    /// Mark the recipient not registered.
    Deregister {
        /// Target recipient.
        recipient: RecipientSlot,
    },

    /// Look up (or build) an unsaved record and save it.
    SaveUnsaved {
        /// Target recipient.
        recipient: RecipientSlot,
    },

    /// Add devices to the recipient's record.
    AddDevices {
        /// Target recipient.
        recipient: RecipientSlot,
        /// Devices to add.
        devices: Vec<DeviceSlot>,
    },

    /// Remove devices from the recipient's record.
    RemoveDevices {
        /// Target recipient.
        recipient: RecipientSlot,
        /// Devices to remove.
        devices: Vec<DeviceSlot>,
    },

    /// Add devices, then drop the transaction without committing.
    AbandonedAdd {
        /// Target recipient.
        recipient: RecipientSlot,
        /// Devices the abandoned transaction added.
        devices: Vec<DeviceSlot>,
    },

    /// Apply a 409 report.
    MismatchedDevices {
        /// Target recipient.
        recipient: RecipientSlot,
        /// Devices the service says are missing.
        missing: Vec<DeviceSlot>,
        /// Devices the service says do not exist.
        extra: Vec<DeviceSlot>,
    },

    /// Apply a 410 report.
    StaleDevices {
        /// Target recipient.
        recipient: RecipientSlot,
        /// Devices with stale sessions.
        stale: Vec<DeviceSlot>,
    },

    /// Apply the local account's device list.
    SyncLinkedDevices {
        /// Devices the service reports, current device possibly included.
        devices: Vec<DeviceSlot>,
    },
}

/// Result of applying an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationResult {
    /// Operation succeeded.
    Ok,

    /// Operation failed.
    Error(OperationError),
}

/// Errors an operation can end with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationError {
    /// Device mutation on an unregistered recipient.
    NotRegistered,

    /// The store failed. Only the real world produces this.
    StoreFailure,
}

impl OperationResult {
    /// Check if operation succeeded.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Check if operation failed.
    pub fn is_err(&self) -> bool {
        !self.is_ok()
    }
}

/// Deterministic operation sequence derived from `seed`.
///
/// May return fewer than `count` operations if the random bytes run out.
pub fn operations_from_seed(seed: u64, count: usize) -> Vec<Operation> {
    let mut bytes = vec![0u8; count.saturating_mul(16)];
    ChaCha8Rng::seed_from_u64(seed).fill_bytes(&mut bytes);

    let mut u = Unstructured::new(&bytes);
    let mut ops = Vec::with_capacity(count);
    while ops.len() < count {
        match Operation::arbitrary(&mut u) {
            Ok(op) => ops.push(op),
            Err(_) => break,
        }
    }
    ops
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_sort_like_slots() {
        let mut names: Vec<String> = (0..RECIPIENT_SLOTS).rev().map(recipient_name).collect();
        names.sort();
        assert_eq!(names, (0..RECIPIENT_SLOTS).map(recipient_name).collect::<Vec<_>>());
    }

    #[test]
    fn device_numbers_are_positive() {
        assert!((0..=u8::MAX).all(|slot| device_number(slot) >= 1));
        assert_eq!(device_number(DEVICE_SLOTS), 1);
    }

    #[test]
    fn seeded_sequences_replay() {
        let first = operations_from_seed(9, 32);
        let second = operations_from_seed(9, 32);
        assert!(!first.is_empty());
        assert_eq!(format!("{first:?}"), format!("{second:?}"));
    }
}
