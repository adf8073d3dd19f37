//! Recipient directory.
//!
//! Lookup, registration transitions and service feedback over a
//! caller-supplied transaction. The directory holds no recipient state of
//! its own; everything it knows is in the store.

use std::sync::Arc;

use roster_proto::{LinkedDevices, MismatchedDevices, StaleDevices};
use tracing::{debug, info, warn};

use crate::{
    DeviceId, DirectoryError, LocalAccount, ReadTransaction, RecipientId, RecipientRecord,
    WriteTransaction,
    codec::{self, RECIPIENT_COLLECTION},
};

/// Maps recipient ids to registration state and device sets.
///
/// Every operation takes the transaction it runs in. Read operations accept
/// any [`ReadTransaction`] (including a write transaction, which sees its own
/// pending changes); mutations require a [`WriteTransaction`].
#[derive(Debug, Clone)]
pub struct RecipientDirectory {
    account: Arc<LocalAccount>,
}

impl RecipientDirectory {
    /// Directory for `account`.
    pub fn new(account: LocalAccount) -> Self {
        Self::from_shared(Arc::new(account))
    }

    /// Directory sharing an account with other components.
    pub fn from_shared(account: Arc<LocalAccount>) -> Self {
        Self { account }
    }

    /// The local account.
    pub fn account(&self) -> &LocalAccount {
        &self.account
    }

    /// The local user's record.
    ///
    /// Built from the account identity, not read from the store, so it is
    /// available before the first transaction and never fails. Its device
    /// set is empty; use [`RecipientDirectory::registered_recipient`] for the
    /// persisted devices.
    pub fn self_recipient(&self) -> RecipientRecord {
        RecipientRecord::new(self.account.recipient_id().clone())
    }

    /// The persisted record for `id`, if any.
    pub fn registered_recipient(
        &self,
        id: &RecipientId,
        txn: &impl ReadTransaction,
    ) -> Result<Option<RecipientRecord>, DirectoryError> {
        let record = codec::load(txn, id)?;
        debug!(recipient = %id, found = record.is_some(), "looked up recipient");
        Ok(record)
    }

    /// The persisted record for `id`, or an unsaved empty one.
    ///
    /// Nothing is written. Persist the result with [`RecipientRecord::save`]
    /// inside a write transaction if needed.
    pub fn get_or_create_unsaved_recipient(
        &self,
        id: &RecipientId,
        txn: &impl ReadTransaction,
    ) -> Result<RecipientRecord, DirectoryError> {
        Ok(self.registered_recipient(id, txn)?.unwrap_or_else(|| RecipientRecord::new(id.clone())))
    }

    /// Whether a record for `id` is persisted.
    pub fn is_registered_account(
        &self,
        id: &RecipientId,
        txn: &impl ReadTransaction,
    ) -> Result<bool, DirectoryError> {
        Ok(self.registered_recipient(id, txn)?.is_some())
    }

    /// Every persisted record, ordered by recipient id.
    pub fn registered_recipients(
        &self,
        txn: &impl ReadTransaction,
    ) -> Result<Vec<RecipientRecord>, DirectoryError> {
        let mut records = Vec::new();
        for key in txn.keys(RECIPIENT_COLLECTION)? {
            if let Some(bytes) = txn.get(RECIPIENT_COLLECTION, &key)? {
                records.push(codec::decode_record(&key, &bytes)?);
            }
        }
        records.sort();
        Ok(records)
    }

    /// Ensure a record for `id` exists and return it.
    ///
    /// An existing record is returned unchanged. Otherwise an empty record is
    /// created and persisted. Calling this repeatedly never duplicates.
    pub fn mark_account_as_registered(
        &self,
        id: &RecipientId,
        txn: &mut impl WriteTransaction,
    ) -> Result<RecipientRecord, DirectoryError> {
        if let Some(existing) = codec::load(txn, id)? {
            return Ok(existing);
        }

        let record = RecipientRecord::new(id.clone());
        record.save(txn)?;
        info!(recipient = %id, "recipient registered");
        Ok(record)
    }

    /// Ensure a record for `id` exists and contains `device_id`.
    pub fn mark_account_as_registered_with_device(
        &self,
        id: &RecipientId,
        device_id: DeviceId,
        txn: &mut impl WriteTransaction,
    ) -> Result<RecipientRecord, DirectoryError> {
        let mut record = self.mark_account_as_registered(id, txn)?;
        if !record.devices().contains(device_id) {
            record.add_devices([device_id], txn)?;
        }
        Ok(record)
    }

    /// Delete the record for `id`. Deleting an absent record is a no-op.
    pub fn mark_account_as_not_registered(
        &self,
        id: &RecipientId,
        txn: &mut impl WriteTransaction,
    ) -> Result<(), DirectoryError> {
        if txn.contains(RECIPIENT_COLLECTION, id.as_str())? {
            codec::remove(txn, id)?;
            info!(recipient = %id, "recipient no longer registered");
        }
        Ok(())
    }

    /// Apply a 409 response: add missing devices, drop extra ones.
    ///
    /// The recipient is registered first; a 409 proves the account exists.
    pub fn apply_mismatched_devices(
        &self,
        id: &RecipientId,
        report: &MismatchedDevices,
        txn: &mut impl WriteTransaction,
    ) -> Result<RecipientRecord, DirectoryError> {
        let mut record = self.mark_account_as_registered(id, txn)?;
        record.add_devices(reported_devices(id, &report.missing_devices), txn)?;
        record.remove_devices(reported_devices(id, &report.extra_devices), txn)?;
        info!(
            recipient = %id,
            missing = report.missing_devices.len(),
            extra = report.extra_devices.len(),
            devices = %record.devices(),
            "applied mismatched devices"
        );
        Ok(record)
    }

    /// Apply a 410 response and return the devices whose sessions the
    /// caller must reset.
    ///
    /// Stale devices stay linked. They are added if the directory did not
    /// know them yet.
    pub fn apply_stale_devices(
        &self,
        id: &RecipientId,
        report: &StaleDevices,
        txn: &mut impl WriteTransaction,
    ) -> Result<Vec<DeviceId>, DirectoryError> {
        let stale = reported_devices(id, &report.stale_devices);
        let mut record = self.mark_account_as_registered(id, txn)?;
        record.add_devices(stale.iter().copied(), txn)?;
        info!(recipient = %id, stale = stale.len(), "applied stale devices");
        Ok(stale)
    }

    /// Reconcile the local account's devices with the service's device list.
    ///
    /// The self record ends up holding exactly the reported devices other
    /// than the one this client runs on. Devices already known keep their
    /// relative order; new ones follow in response order.
    pub fn apply_linked_devices(
        &self,
        report: &LinkedDevices,
        txn: &mut impl WriteTransaction,
    ) -> Result<RecipientRecord, DirectoryError> {
        let id = self.account.recipient_id();
        let current = self.account.device_id();
        let raw: Vec<u32> = report.ids().collect();
        let reported: Vec<DeviceId> = reported_devices(id, &raw)
            .into_iter()
            .filter(|device| *device != current)
            .collect();

        let mut record = self.mark_account_as_registered(id, txn)?;
        let unlinked: Vec<DeviceId> =
            record.devices().iter().filter(|device| !reported.contains(device)).collect();

        if !unlinked.is_empty() {
            record.remove_devices(unlinked, txn)?;
        }
        record.add_devices(reported, txn)?;

        info!(recipient = %id, devices = %record.devices(), "applied linked devices");
        Ok(record)
    }
}

/// Validate device ids from a service report. Zero is skipped.
fn reported_devices(id: &RecipientId, raw: &[u32]) -> Vec<DeviceId> {
    raw.iter()
        .filter_map(|device| match DeviceId::new(*device) {
            Ok(device) => Some(device),
            Err(_) => {
                warn!(recipient = %id, device, "ignoring invalid device id in service report");
                None
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use roster_proto::LinkedDevice;

    use super::*;
    use crate::{TransactionalStore, store::testing::FakeStore};

    fn id(s: &str) -> RecipientId {
        RecipientId::new(s).unwrap()
    }

    fn dev(raw: u32) -> DeviceId {
        DeviceId::new(raw).unwrap()
    }

    fn devices(raw: &[u32]) -> Vec<DeviceId> {
        raw.iter().map(|r| dev(*r)).collect()
    }

    fn directory() -> RecipientDirectory {
        RecipientDirectory::new(LocalAccount::with_device(id("+15550000000"), dev(2)))
    }

    fn linked(ids: &[u32]) -> LinkedDevices {
        LinkedDevices {
            devices: ids
                .iter()
                .map(|id| LinkedDevice { id: *id, name: None, created: 0, last_seen: 0 })
                .collect(),
        }
    }

    #[test]
    fn unknown_recipient_is_absent() {
        let store = FakeStore::default();
        let dir = directory();

        let txn = store.begin_read().unwrap();
        assert_eq!(dir.registered_recipient(&id("nobody"), &txn).unwrap(), None);
        assert!(!dir.is_registered_account(&id("nobody"), &txn).unwrap());
    }

    #[test]
    fn unsaved_recipient_is_not_persisted() {
        let store = FakeStore::default();
        let dir = directory();

        let record = store.read(|txn| dir.get_or_create_unsaved_recipient(&id("bob"), txn)).unwrap();
        assert_eq!(record.recipient_id(), &id("bob"));
        assert!(record.devices().is_empty());
        assert!(!store.read(|txn| dir.is_registered_account(&id("bob"), txn)).unwrap());

        store.write(|txn| record.save(txn)).unwrap();
        assert!(store.read(|txn| dir.is_registered_account(&id("bob"), txn)).unwrap());
    }

    #[test]
    fn unsaved_lookup_returns_existing_record() {
        let store = FakeStore::default();
        let dir = directory();
        store
            .write(|txn| dir.mark_account_as_registered_with_device(&id("bob"), dev(4), txn))
            .unwrap();

        let record = store.read(|txn| dir.get_or_create_unsaved_recipient(&id("bob"), txn)).unwrap();
        assert_eq!(record.devices().to_vec(), devices(&[4]));
    }

    #[test]
    fn mark_registered_is_idempotent() {
        let store = FakeStore::default();
        let dir = directory();

        store
            .write(|txn| dir.mark_account_as_registered_with_device(&id("bob"), dev(1), txn))
            .unwrap();
        let again = store.write(|txn| dir.mark_account_as_registered(&id("bob"), txn)).unwrap();

        assert_eq!(again.devices().to_vec(), devices(&[1]));
        assert_eq!(store.read(|txn| dir.registered_recipients(txn)).unwrap().len(), 1);
    }

    #[test]
    fn registering_a_known_device_is_a_no_op() {
        let store = FakeStore::default();
        let dir = directory();

        for _ in 0..3 {
            store
                .write(|txn| dir.mark_account_as_registered_with_device(&id("bob"), dev(1), txn))
                .unwrap();
        }

        let record = store.read(|txn| dir.registered_recipient(&id("bob"), txn)).unwrap().unwrap();
        assert_eq!(record.devices().to_vec(), devices(&[1]));
    }

    #[test]
    fn not_registered_deletes_and_tolerates_absence() {
        let store = FakeStore::default();
        let dir = directory();

        store.write(|txn| dir.mark_account_as_not_registered(&id("bob"), txn)).unwrap();
        store
            .write(|txn| dir.mark_account_as_registered_with_device(&id("bob"), dev(3), txn))
            .unwrap();
        store.write(|txn| dir.mark_account_as_not_registered(&id("bob"), txn)).unwrap();

        assert_eq!(store.read(|txn| dir.registered_recipient(&id("bob"), txn)).unwrap(), None);
    }

    #[test]
    fn write_transaction_sees_its_own_registration() {
        let store = FakeStore::default();
        let dir = directory();

        let mut txn = store.begin_write().unwrap();
        dir.mark_account_as_registered(&id("bob"), &mut txn).unwrap();
        assert!(dir.is_registered_account(&id("bob"), &txn).unwrap());
        drop(txn);

        assert!(!store.read(|txn| dir.is_registered_account(&id("bob"), txn)).unwrap());
    }

    #[test]
    fn self_recipient_is_stable_and_storeless() {
        let dir = directory();
        let first = dir.self_recipient();
        let second = dir.self_recipient();

        assert_eq!(first.recipient_id(), &id("+15550000000"));
        assert_eq!(first.recipient_id(), second.recipient_id());
        assert!(first.devices().is_empty());
    }

    #[test]
    fn registered_recipients_are_sorted() {
        let store = FakeStore::default();
        let dir = directory();
        store
            .write(|txn| {
                for name in ["carol", "alice", "bob"] {
                    dir.mark_account_as_registered(&id(name), txn)?;
                }
                Ok::<_, DirectoryError>(())
            })
            .unwrap();

        let names: Vec<String> = store
            .read(|txn| dir.registered_recipients(txn))
            .unwrap()
            .iter()
            .map(|r| r.recipient_id().to_string())
            .collect();
        assert_eq!(names, ["alice", "bob", "carol"]);
    }

    #[test]
    fn mismatched_devices_add_and_remove() {
        let store = FakeStore::default();
        let dir = directory();
        store
            .write(|txn| dir.mark_account_as_registered_with_device(&id("bob"), dev(1), txn))
            .unwrap();

        let report = MismatchedDevices { missing_devices: vec![2, 3], extra_devices: vec![1, 0] };
        let record =
            store.write(|txn| dir.apply_mismatched_devices(&id("bob"), &report, txn)).unwrap();

        assert_eq!(record.devices().to_vec(), devices(&[2, 3]));
    }

    #[test]
    fn mismatched_devices_register_unknown_recipient() {
        let store = FakeStore::default();
        let dir = directory();

        let report = MismatchedDevices { missing_devices: vec![1], extra_devices: vec![] };
        store.write(|txn| dir.apply_mismatched_devices(&id("new"), &report, txn)).unwrap();

        let record = store.read(|txn| dir.registered_recipient(&id("new"), txn)).unwrap().unwrap();
        assert_eq!(record.devices().to_vec(), devices(&[1]));
    }

    #[test]
    fn stale_devices_stay_linked() {
        let store = FakeStore::default();
        let dir = directory();
        store
            .write(|txn| dir.mark_account_as_registered_with_device(&id("bob"), dev(1), txn))
            .unwrap();

        let report = StaleDevices { stale_devices: vec![1, 5] };
        let stale = store.write(|txn| dir.apply_stale_devices(&id("bob"), &report, txn)).unwrap();

        assert_eq!(stale, devices(&[1, 5]));
        let record = store.read(|txn| dir.registered_recipient(&id("bob"), txn)).unwrap().unwrap();
        assert_eq!(record.devices().to_vec(), devices(&[1, 5]));
    }

    #[test]
    fn linked_devices_exclude_current_device() {
        let store = FakeStore::default();
        let dir = directory();
        let me = dir.account().recipient_id().clone();
        store
            .write(|txn| {
                let mut record = dir.mark_account_as_registered(&me, txn)?;
                record.add_devices(devices(&[4, 1, 3]), txn)
            })
            .unwrap();

        let record = store.write(|txn| dir.apply_linked_devices(&linked(&[1, 2, 5, 4]), txn)).unwrap();

        assert_eq!(record.devices().to_vec(), devices(&[4, 1, 5]));
        let stored = store.read(|txn| dir.registered_recipient(&me, txn)).unwrap().unwrap();
        assert_eq!(stored.devices().to_vec(), devices(&[4, 1, 5]));
    }

    #[test]
    fn linked_devices_drop_current_device_saved_earlier() {
        let store = FakeStore::default();
        let dir = directory();
        let me = dir.account().recipient_id().clone();
        store
            .write(|txn| dir.mark_account_as_registered_with_device(&me, dev(2), txn))
            .unwrap();

        let record = store.write(|txn| dir.apply_linked_devices(&linked(&[1, 2]), txn)).unwrap();

        assert_eq!(record.devices().to_vec(), devices(&[1]));
    }
}
