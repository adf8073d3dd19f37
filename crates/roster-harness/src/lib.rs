//! Test harness for the roster directory.
//!
//! # Model-Based Testing
//!
//! The `model` module holds a reference directory built on a plain
//! `BTreeMap`. The `world` module drives the real [`RecipientDirectory`]
//! over any store with the same operations. Tests apply one operation
//! sequence to both and compare observable state after every step.
//!
//! [`RecipientDirectory`]: roster_core::RecipientDirectory

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod model;
pub mod world;

pub use model::{
    DEVICE_SLOTS, DeviceSlot, ModelDirectory, ObservableState, Operation, OperationError,
    OperationResult, RECIPIENT_SLOTS, RecipientSlot, SELF_SLOT, device_number,
    operations_from_seed, recipient_name,
};
pub use world::DirectoryWorld;
