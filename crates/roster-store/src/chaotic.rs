//! Fault-injecting store for atomicity tests.
//!
//! Wraps a [`MemoryStore`] and fails `put`, `delete` and `commit` with
//! `StoreError::Io` at a configured rate. The RNG is seeded, so a failing
//! run replays exactly.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use roster_core::{ReadTransaction, StoreError, TransactionalStore, WriteTransaction};

use crate::{MemoryRead, MemoryStore, MemoryWrite};

/// Store that randomly fails writes.
#[derive(Debug)]
pub struct ChaoticStore {
    inner: MemoryStore,
    rng: Mutex<ChaCha8Rng>,
    failure_rate: f64,
    injected: AtomicU64,
}

impl ChaoticStore {
    /// Wrap `inner`, failing each write operation with probability
    /// `failure_rate` (clamped to `0.0..=1.0`).
    pub fn new(inner: MemoryStore, seed: u64, failure_rate: f64) -> Self {
        let failure_rate = if failure_rate.is_nan() { 0.0 } else { failure_rate.clamp(0.0, 1.0) };
        Self {
            inner,
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
            failure_rate,
            injected: AtomicU64::new(0),
        }
    }

    /// The wrapped store. Bypasses fault injection.
    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    /// Number of faults injected so far.
    pub fn injected_faults(&self) -> u64 {
        self.injected.load(Ordering::Relaxed)
    }

    fn maybe_fail(&self, operation: &'static str) -> Result<(), StoreError> {
        if self.rng.lock().gen_bool(self.failure_rate) {
            self.injected.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(operation, "injected store fault");
            return Err(StoreError::Io { reason: format!("injected fault during {operation}") });
        }
        Ok(())
    }
}

impl TransactionalStore for ChaoticStore {
    type Read<'a> = MemoryRead;
    type Write<'a> = ChaoticWrite<'a>;

    fn begin_read(&self) -> Result<MemoryRead, StoreError> {
        self.inner.begin_read()
    }

    fn begin_write(&self) -> Result<ChaoticWrite<'_>, StoreError> {
        Ok(ChaoticWrite { store: self, inner: self.inner.begin_write()? })
    }
}

/// Write transaction that may fail on any mutation or on commit.
#[derive(Debug)]
pub struct ChaoticWrite<'a> {
    store: &'a ChaoticStore,
    inner: MemoryWrite<'a>,
}

impl ReadTransaction for ChaoticWrite<'_> {
    fn get(&self, collection: &str, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.inner.get(collection, key)
    }

    fn keys(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        self.inner.keys(collection)
    }
}

impl WriteTransaction for ChaoticWrite<'_> {
    fn put(&mut self, collection: &str, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.store.maybe_fail("put")?;
        self.inner.put(collection, key, value)
    }

    fn delete(&mut self, collection: &str, key: &str) -> Result<(), StoreError> {
        self.store.maybe_fail("delete")?;
        self.inner.delete(collection, key)
    }

    fn commit(self) -> Result<(), StoreError> {
        self.store.maybe_fail("commit")?;
        self.inner.commit()
    }
}
