//! Real directory driven by model operations.
//!
//! Mirrors [`ModelDirectory`](crate::ModelDirectory): same operations, same
//! result type, same observable state. Each operation runs in its own
//! transaction.

use roster_core::{
    DeviceId, DirectoryError, InvalidRecipientId, LocalAccount, RecipientDirectory, RecipientId,
    TransactionalStore,
};
use roster_proto::{LinkedDevice, LinkedDevices, MismatchedDevices, StaleDevices};

use crate::model::{
    DEVICE_SLOTS, DeviceSlot, ObservableState, Operation, OperationError, OperationResult,
    RECIPIENT_SLOTS, RecipientSlot, SELF_SLOT, device_number, recipient_name,
};

/// A [`RecipientDirectory`] over store `S`, addressed by slots.
pub struct DirectoryWorld<S> {
    store: S,
    directory: RecipientDirectory,
    recipients: Vec<RecipientId>,
    devices: Vec<DeviceId>,
}

impl<S: TransactionalStore> DirectoryWorld<S> {
    /// World over `store`. The local account is slot 0 on the primary device.
    pub fn new(store: S) -> Result<Self, InvalidRecipientId> {
        let recipients = (0..RECIPIENT_SLOTS)
            .map(|slot| RecipientId::new(recipient_name(slot)))
            .collect::<Result<Vec<_>, _>>()?;
        let devices = (0..DEVICE_SLOTS)
            .filter_map(|slot| DeviceId::new(device_number(slot)).ok())
            .collect();
        let directory = RecipientDirectory::new(LocalAccount::new(RecipientId::new(
            recipient_name(SELF_SLOT),
        )?));

        Ok(Self { store, directory, recipients, devices })
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The directory under test.
    pub fn directory(&self) -> &RecipientDirectory {
        &self.directory
    }

    /// Apply an operation and return the result.
    pub fn apply(&self, op: &Operation) -> OperationResult {
        match self.run(op) {
            Ok(()) => OperationResult::Ok,
            Err(DirectoryError::NotRegistered { .. }) => {
                OperationResult::Error(OperationError::NotRegistered)
            },
            Err(_) => OperationResult::Error(OperationError::StoreFailure),
        }
    }

    /// Extract observable state for comparison.
    pub fn observable_state(&self) -> Result<ObservableState, DirectoryError> {
        let records = self.store.read(|txn| self.directory.registered_recipients(txn))?;
        Ok(ObservableState {
            recipients: records
                .iter()
                .map(|r| {
                    (r.recipient_id().to_string(), r.devices().iter().map(DeviceId::get).collect())
                })
                .collect(),
        })
    }

    fn run(&self, op: &Operation) -> Result<(), DirectoryError> {
        let dir = &self.directory;
        match op {
            Operation::Register { recipient } => {
                let id = self.recipient(*recipient);
                self.store.write(|txn| dir.mark_account_as_registered(id, txn).map(drop))
            },
            Operation::RegisterWithDevice { recipient, device } => {
                let id = self.recipient(*recipient);
                let device = self.device(*device);
                self.store.write(|txn| {
                    dir.mark_account_as_registered_with_device(id, device, txn).map(drop)
                })
            },
            Operation::Deregister { recipient } => {
                let id = self.recipient(*recipient);
                self.store.write(|txn| dir.mark_account_as_not_registered(id, txn))
            },
            Operation::SaveUnsaved { recipient } => {
                let id = self.recipient(*recipient);
                self.store.write(|txn| dir.get_or_create_unsaved_recipient(id, txn)?.save(txn))
            },
            Operation::AddDevices { recipient, devices } => {
                let id = self.recipient(*recipient);
                let mut record =
                    self.store.read(|txn| dir.get_or_create_unsaved_recipient(id, txn))?;
                self.store.write(|txn| record.add_devices(self.device_ids(devices), txn))
            },
            Operation::RemoveDevices { recipient, devices } => {
                let id = self.recipient(*recipient);
                let mut record =
                    self.store.read(|txn| dir.get_or_create_unsaved_recipient(id, txn))?;
                self.store.write(|txn| record.remove_devices(self.device_ids(devices), txn))
            },
            Operation::AbandonedAdd { recipient, devices } => {
                let id = self.recipient(*recipient);
                let mut record =
                    self.store.read(|txn| dir.get_or_create_unsaved_recipient(id, txn))?;
                let mut txn = self.store.begin_write()?;
                record.add_devices(self.device_ids(devices), &mut txn)?;
                drop(txn);
                Ok(())
            },
            Operation::MismatchedDevices { recipient, missing, extra } => {
                let id = self.recipient(*recipient);
                let report = MismatchedDevices {
                    missing_devices: raw_devices(missing),
                    extra_devices: raw_devices(extra),
                };
                self.store.write(|txn| dir.apply_mismatched_devices(id, &report, txn).map(drop))
            },
            Operation::StaleDevices { recipient, stale } => {
                let id = self.recipient(*recipient);
                let report = StaleDevices { stale_devices: raw_devices(stale) };
                self.store.write(|txn| dir.apply_stale_devices(id, &report, txn).map(drop))
            },
            Operation::SyncLinkedDevices { devices } => {
                let report = LinkedDevices {
                    devices: raw_devices(devices)
                        .into_iter()
                        .map(|id| LinkedDevice { id, name: None, created: 0, last_seen: 0 })
                        .collect(),
                };
                self.store.write(|txn| dir.apply_linked_devices(&report, txn).map(drop))
            },
        }
    }

    fn recipient(&self, slot: RecipientSlot) -> &RecipientId {
        &self.recipients[usize::from(slot % RECIPIENT_SLOTS)]
    }

    fn device(&self, slot: DeviceSlot) -> DeviceId {
        self.devices[usize::from(slot % DEVICE_SLOTS)]
    }

    fn device_ids(&self, slots: &[DeviceSlot]) -> Vec<DeviceId> {
        slots.iter().map(|s| self.device(*s)).collect()
    }
}

fn raw_devices(slots: &[DeviceSlot]) -> Vec<u32> {
    slots.iter().map(|s| device_number(*s)).collect()
}
