//! Fuzz target for the recipient directory against the reference model
//!
//! # Strategy
//!
//! - Operation sequences: arbitrary registration, device churn and service
//!   feedback over a small pool of recipient and device slots
//! - Abandoned writes: transactions dropped without commit
//!
//! # Invariants
//!
//! - Every operation result matches the model
//! - Observable state matches the model after every step
//! - Device sets never hold duplicates
//! - NEVER a store failure on the in-memory store

#![no_main]

use std::collections::BTreeSet;

use libfuzzer_sys::fuzz_target;
use roster_harness::{DirectoryWorld, ModelDirectory, Operation, OperationError, OperationResult};
use roster_store::MemoryStore;

fuzz_target!(|ops: Vec<Operation>| {
    let Ok(world) = DirectoryWorld::new(MemoryStore::new()) else {
        panic!("slot names must be valid recipient ids");
    };
    let mut model = ModelDirectory::new();

    for op in ops.iter().take(256) {
        let expected = model.apply(op);
        let actual = world.apply(op);

        assert_ne!(
            actual,
            OperationResult::Error(OperationError::StoreFailure),
            "store failure on {op:?}"
        );
        assert_eq!(expected, actual, "result diverged on {op:?}");

        let state = match world.observable_state() {
            Ok(state) => state,
            Err(err) => panic!("unreadable state after {op:?}: {err}"),
        };
        assert_eq!(model.observable_state(), state, "state diverged on {op:?}");

        for (recipient, devices) in &state.recipients {
            let unique: BTreeSet<_> = devices.iter().collect();
            assert_eq!(unique.len(), devices.len(), "duplicate device for {recipient}");
        }
    }
});
