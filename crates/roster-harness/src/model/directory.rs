//! Model directory - the reference implementation.

use std::collections::BTreeMap;

use super::operation::{
    DeviceSlot, Operation, OperationError, OperationResult, SELF_SLOT, device_number,
    recipient_name,
};

/// Observable state for oracle comparison.
///
/// Registered recipients in id order, each with its devices in insertion
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservableState {
    /// `(recipient id, devices)` pairs.
    pub recipients: Vec<(String, Vec<u32>)>,
}

impl ObservableState {
    /// Devices of `recipient`, if registered.
    pub fn devices(&self, recipient: &str) -> Option<&[u32]> {
        self.recipients.iter().find(|(id, _)| id == recipient).map(|(_, d)| d.as_slice())
    }
}

/// Reference directory.
#[derive(Debug, Clone, Default)]
pub struct ModelDirectory {
    recipients: BTreeMap<String, Vec<u32>>,
}

impl ModelDirectory {
    /// Empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an operation and return the result.
    pub fn apply(&mut self, op: &Operation) -> OperationResult {
        match op {
            Operation::Register { recipient } | Operation::SaveUnsaved { recipient } => {
                self.register(&recipient_name(*recipient));
                OperationResult::Ok
            },
            Operation::RegisterWithDevice { recipient, device } => {
                let devices = self.register(&recipient_name(*recipient));
                union(devices, &[*device]);
                OperationResult::Ok
            },
            Operation::Deregister { recipient } => {
                self.recipients.remove(&recipient_name(*recipient));
                OperationResult::Ok
            },
            Operation::AddDevices { recipient, devices } => {
                match self.recipients.get_mut(&recipient_name(*recipient)) {
                    Some(existing) => {
                        union(existing, devices);
                        OperationResult::Ok
                    },
                    None => OperationResult::Error(OperationError::NotRegistered),
                }
            },
            Operation::RemoveDevices { recipient, devices } => {
                match self.recipients.get_mut(&recipient_name(*recipient)) {
                    Some(existing) => {
                        subtract(existing, devices);
                        OperationResult::Ok
                    },
                    None => OperationResult::Error(OperationError::NotRegistered),
                }
            },
            Operation::AbandonedAdd { recipient, .. } => {
                if self.recipients.contains_key(&recipient_name(*recipient)) {
                    OperationResult::Ok
                } else {
                    OperationResult::Error(OperationError::NotRegistered)
                }
            },
            Operation::MismatchedDevices { recipient, missing, extra } => {
                let devices = self.register(&recipient_name(*recipient));
                union(devices, missing);
                subtract(devices, extra);
                OperationResult::Ok
            },
            Operation::StaleDevices { recipient, stale } => {
                let devices = self.register(&recipient_name(*recipient));
                union(devices, stale);
                OperationResult::Ok
            },
            Operation::SyncLinkedDevices { devices: reported } => {
                let current = device_number(0);
                let reported: Vec<u32> =
                    reported.iter().map(|d| device_number(*d)).filter(|d| *d != current).collect();
                let devices = self.register(&recipient_name(SELF_SLOT));
                devices.retain(|d| reported.contains(d));
                for device in reported {
                    if !devices.contains(&device) {
                        devices.push(device);
                    }
                }
                OperationResult::Ok
            },
        }
    }

    /// Extract observable state for comparison.
    pub fn observable_state(&self) -> ObservableState {
        ObservableState {
            recipients: self.recipients.iter().map(|(id, d)| (id.clone(), d.clone())).collect(),
        }
    }

    fn register(&mut self, id: &str) -> &mut Vec<u32> {
        self.recipients.entry(id.to_string()).or_default()
    }
}

fn union(devices: &mut Vec<u32>, slots: &[DeviceSlot]) {
    for device in slots.iter().map(|s| device_number(*s)) {
        if !devices.contains(&device) {
            devices.push(device);
        }
    }
}

fn subtract(devices: &mut Vec<u32>, slots: &[DeviceSlot]) {
    let removed: Vec<u32> = slots.iter().map(|s| device_number(*s)).collect();
    devices.retain(|d| !removed.contains(d));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_number_scenario() {
        let mut model = ModelDirectory::new();
        let r = 1;
        let alice = recipient_name(r);

        model.apply(&Operation::RegisterWithDevice { recipient: r, device: 0 });
        assert_eq!(model.observable_state().devices(&alice), Some(&[1][..]));

        model.apply(&Operation::AddDevices { recipient: r, devices: vec![1, 2] });
        assert_eq!(model.observable_state().devices(&alice), Some(&[1, 2, 3][..]));

        model.apply(&Operation::RemoveDevices { recipient: r, devices: vec![0] });
        assert_eq!(model.observable_state().devices(&alice), Some(&[2, 3][..]));

        model.apply(&Operation::Deregister { recipient: r });
        assert_eq!(model.observable_state().devices(&alice), None);
    }

    #[test]
    fn mutation_requires_registration() {
        let mut model = ModelDirectory::new();
        let result = model.apply(&Operation::AddDevices { recipient: 2, devices: vec![1] });
        assert_eq!(result, OperationResult::Error(OperationError::NotRegistered));
        assert!(model.observable_state().recipients.is_empty());
    }

    #[test]
    fn linked_devices_skip_current_device() {
        let mut model = ModelDirectory::new();
        model.apply(&Operation::SyncLinkedDevices { devices: vec![0, 3, 1] });
        let me = recipient_name(SELF_SLOT);
        assert_eq!(model.observable_state().devices(&me), Some(&[4, 2][..]));
    }
}
