//! Reference model for model-based testing.
//!
//! The model is the obviously-correct version of the directory: an ordered
//! map from recipient name to a vector of device ids. No store, no codec, no
//! transactions.

mod directory;
pub mod operation;

pub use directory::{ModelDirectory, ObservableState};
pub use operation::{
    DEVICE_SLOTS, DeviceSlot, Operation, OperationError, OperationResult, RECIPIENT_SLOTS,
    RecipientSlot, SELF_SLOT, device_number, operations_from_seed, recipient_name,
};
