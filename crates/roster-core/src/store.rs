//! Transactional store contract.
//!
//! The directory never talks to a database directly. It is handed a
//! transaction and performs synchronous reads and writes through it. Any
//! store that provides the guarantees below can back the directory.
//!
//! # Invariants
//!
//! - Snapshot isolation: a read transaction observes one committed state
//!   for its whole lifetime, no matter what commits afterwards.
//! - Single writer: at most one write transaction is open at a time;
//!   `begin_write` blocks until the previous writer commits or is dropped.
//! - Atomicity: a write transaction's changes become visible all at once on
//!   `commit`, or not at all. Dropping an uncommitted write transaction
//!   discards its changes.
//! - Read-your-writes: reads through a write transaction see that
//!   transaction's own pending changes.
//!
//! A read transaction has no mutating methods, so "write through a read
//! transaction" cannot be expressed.

use thiserror::Error;

/// Errors raised by a store implementation.
///
/// The directory passes these through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backing medium failed (disk, lock file, injected fault).
    #[error("store I/O error: {reason}")]
    Io {
        /// Description of the failure.
        reason: String,
    },

    /// Persisted store state could not be encoded or decoded.
    #[error("store codec error: {reason}")]
    Codec {
        /// Description of the failure.
        reason: String,
    },
}

impl StoreError {
    /// Returns true if retrying the whole transaction may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

/// Read access to one consistent snapshot.
pub trait ReadTransaction {
    /// Value stored under `key` in `collection`.
    fn get(&self, collection: &str, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// All keys in `collection`, sorted.
    fn keys(&self, collection: &str) -> Result<Vec<String>, StoreError>;

    /// Whether `key` exists in `collection`.
    fn contains(&self, collection: &str, key: &str) -> Result<bool, StoreError> {
        Ok(self.get(collection, key)?.is_some())
    }
}

/// Read-write access. Pending changes are private to the transaction until
/// [`WriteTransaction::commit`].
pub trait WriteTransaction: ReadTransaction {
    /// Insert or replace the value under `key`.
    fn put(&mut self, collection: &str, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn delete(&mut self, collection: &str, key: &str) -> Result<(), StoreError>;

    /// Publish all pending changes atomically and release the writer slot.
    fn commit(self) -> Result<(), StoreError>
    where
        Self: Sized;
}

/// A key-value store with snapshot-isolated transactions.
pub trait TransactionalStore: Send + Sync {
    /// Read transaction type.
    type Read<'a>: ReadTransaction
    where
        Self: 'a;

    /// Write transaction type.
    type Write<'a>: WriteTransaction
    where
        Self: 'a;

    /// Open a read transaction on the latest committed snapshot.
    fn begin_read(&self) -> Result<Self::Read<'_>, StoreError>;

    /// Open a write transaction, waiting for any other writer to finish.
    fn begin_write(&self) -> Result<Self::Write<'_>, StoreError>;

    /// Run `f` inside a read transaction.
    fn read<'s, T, E>(&'s self, f: impl FnOnce(&Self::Read<'s>) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let txn = self.begin_read()?;
        f(&txn)
    }

    /// Run `f` inside a write transaction and commit if it returns `Ok`.
    ///
    /// On `Err` the transaction is dropped and nothing is published.
    fn write<'s, T, E>(
        &'s self,
        f: impl FnOnce(&mut Self::Write<'s>) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let mut txn = self.begin_write()?;
        let value = f(&mut txn)?;
        txn.commit()?;
        Ok(value)
    }
}
