//! In-memory MVCC store with optional file backing.
//!
//! Committed state is an immutable snapshot behind an `Arc`. A read
//! transaction clones the `Arc` and never sees later commits. A write
//! transaction holds the writer lock, buffers its changes, and on commit
//! builds the next snapshot and swaps it in.
//!
//! # Invariants
//!
//! - Versions increase by one per commit that changed something
//! - A snapshot is never mutated after it is published
//! - With file backing, a commit is published only after the file write
//!   succeeded
//! - With file backing, one store handle owns the file at a time; the
//!   exclusive lock on `<file>.lock` is held until the handle is dropped

use std::{
    collections::BTreeMap,
    ffi::OsStr,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    sync::Arc,
};

use fs2::FileExt;
use parking_lot::{Mutex, MutexGuard, RwLock};
use roster_core::{ReadTransaction, StoreError, TransactionalStore, WriteTransaction};
use serde::{Deserialize, Serialize};

/// collection -> key -> value
type Snapshot = BTreeMap<String, BTreeMap<String, Vec<u8>>>;

#[derive(Debug, Default)]
struct Committed {
    snapshot: Arc<Snapshot>,
    version: u64,
}

#[derive(Serialize)]
struct SnapshotFileRef<'a> {
    version: u64,
    collections: &'a Snapshot,
}

#[derive(Deserialize)]
struct SnapshotFile {
    version: u64,
    collections: Snapshot,
}

/// Snapshot-isolated key-value store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    committed: RwLock<Committed>,
    writer: Mutex<()>,
    path: Option<PathBuf>,
    _lock_file: Option<File>,
}

impl MemoryStore {
    /// Empty store with no file backing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store backed by the CBOR file at `path`.
    ///
    /// An existing file is loaded; a missing one starts an empty store. The
    /// file is rewritten on every commit. The returned store holds an
    /// exclusive lock on the file until it is dropped.
    ///
    /// # Errors
    ///
    /// - `StoreError::Io` if another handle holds the file, or the file
    ///   exists but cannot be read
    /// - `StoreError::Codec` if the file is not a snapshot
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let lock_file = acquire_lock(&path)?;

        let committed = match fs::read(&path) {
            Ok(bytes) => {
                let file: SnapshotFile = ciborium::from_reader(bytes.as_slice())
                    .map_err(|e| StoreError::Codec { reason: e.to_string() })?;
                Committed { snapshot: Arc::new(file.collections), version: file.version }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Committed::default(),
            Err(e) => return Err(io_error(&path, "read", &e)),
        };

        tracing::debug!(path = %path.display(), version = committed.version, "opened store");
        Ok(Self {
            committed: RwLock::new(committed),
            writer: Mutex::new(()),
            path: Some(path),
            _lock_file: Some(lock_file),
        })
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Version of the latest committed snapshot.
    pub fn version(&self) -> u64 {
        self.committed.read().version
    }

    fn latest(&self) -> (Arc<Snapshot>, u64) {
        let committed = self.committed.read();
        (Arc::clone(&committed.snapshot), committed.version)
    }

    fn publish(&self, snapshot: Snapshot) -> Result<u64, StoreError> {
        let version = self.version() + 1;

        if let Some(path) = &self.path {
            write_atomic(path, version, &snapshot)?;
        }

        let mut committed = self.committed.write();
        committed.snapshot = Arc::new(snapshot);
        committed.version = version;
        Ok(version)
    }
}

impl TransactionalStore for MemoryStore {
    type Read<'a> = MemoryRead;
    type Write<'a> = MemoryWrite<'a>;

    fn begin_read(&self) -> Result<MemoryRead, StoreError> {
        let (snapshot, version) = self.latest();
        Ok(MemoryRead { snapshot, version })
    }

    fn begin_write(&self) -> Result<MemoryWrite<'_>, StoreError> {
        let guard = self.writer.lock();
        let (base, version) = self.latest();
        Ok(MemoryWrite { store: self, _guard: guard, base, version, pending: BTreeMap::new() })
    }
}

/// Read transaction over one committed snapshot.
#[derive(Debug, Clone)]
pub struct MemoryRead {
    snapshot: Arc<Snapshot>,
    version: u64,
}

impl MemoryRead {
    /// Version of the snapshot this transaction reads.
    pub fn version(&self) -> u64 {
        self.version
    }
}

impl ReadTransaction for MemoryRead {
    fn get(&self, collection: &str, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.snapshot.get(collection).and_then(|c| c.get(key)).cloned())
    }

    fn keys(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        Ok(self.snapshot.get(collection).map(|c| c.keys().cloned().collect()).unwrap_or_default())
    }
}

/// Write transaction. Holds the writer lock until committed or dropped.
pub struct MemoryWrite<'a> {
    store: &'a MemoryStore,
    _guard: MutexGuard<'a, ()>,
    base: Arc<Snapshot>,
    version: u64,
    pending: BTreeMap<(String, String), Option<Vec<u8>>>,
}

impl MemoryWrite<'_> {
    /// Version of the snapshot this transaction started from.
    pub fn base_version(&self) -> u64 {
        self.version
    }

    /// Number of buffered puts and deletes.
    pub fn pending_changes(&self) -> usize {
        self.pending.len()
    }
}

impl std::fmt::Debug for MemoryWrite<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryWrite")
            .field("base_version", &self.version)
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

impl ReadTransaction for MemoryWrite<'_> {
    fn get(&self, collection: &str, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        if let Some(pending) = self.pending.get(&(collection.to_string(), key.to_string())) {
            return Ok(pending.clone());
        }
        Ok(self.base.get(collection).and_then(|c| c.get(key)).cloned())
    }

    fn keys(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        let mut keys: Vec<String> =
            self.base.get(collection).map(|c| c.keys().cloned().collect()).unwrap_or_default();

        for ((c, key), value) in &self.pending {
            if c != collection {
                continue;
            }
            match value {
                Some(_) => {
                    if let Err(at) = keys.binary_search(key) {
                        keys.insert(at, key.clone());
                    }
                },
                None => keys.retain(|k| k != key),
            }
        }

        Ok(keys)
    }
}

impl WriteTransaction for MemoryWrite<'_> {
    fn put(&mut self, collection: &str, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.pending.insert((collection.to_string(), key.to_string()), Some(value));
        Ok(())
    }

    fn delete(&mut self, collection: &str, key: &str) -> Result<(), StoreError> {
        self.pending.insert((collection.to_string(), key.to_string()), None);
        Ok(())
    }

    fn commit(self) -> Result<(), StoreError> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let changes = self.pending.len();
        let mut next = Snapshot::clone(&self.base);
        for ((collection, key), value) in self.pending {
            match value {
                Some(value) => {
                    next.entry(collection).or_default().insert(key, value);
                },
                None => {
                    if let Some(c) = next.get_mut(&collection) {
                        c.remove(&key);
                        if c.is_empty() {
                            next.remove(&collection);
                        }
                    }
                },
            }
        }

        let version = self.store.publish(next)?;
        tracing::debug!(version, changes, "committed write transaction");
        Ok(())
    }
}

fn write_atomic(path: &Path, version: u64, snapshot: &Snapshot) -> Result<(), StoreError> {
    let mut bytes = Vec::new();
    ciborium::into_writer(&SnapshotFileRef { version, collections: snapshot }, &mut bytes)
        .map_err(|e| StoreError::Codec { reason: e.to_string() })?;

    let temp_path = sibling(path, ".tmp");
    let mut file = fs::File::create(&temp_path).map_err(|e| io_error(&temp_path, "create", &e))?;
    file.write_all(&bytes).map_err(|e| io_error(&temp_path, "write", &e))?;
    file.sync_all().map_err(|e| io_error(&temp_path, "sync", &e))?;
    fs::rename(&temp_path, path).map_err(|e| io_error(path, "rename into", &e))?;

    Ok(())
}

fn acquire_lock(path: &Path) -> Result<File, StoreError> {
    let lock_path = sibling(path, ".lock");
    let lock_file = File::create(&lock_path).map_err(|e| io_error(&lock_path, "create", &e))?;

    lock_file.try_lock_exclusive().map_err(|e| {
        tracing::warn!(path = %path.display(), error = %e, "store file is locked");
        StoreError::Io { reason: format!("{} is in use by another store", path.display()) }
    })?;

    Ok(lock_file)
}

/// `path` with `suffix` appended to its full file name.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(OsStr::new(suffix));
    PathBuf::from(name)
}

fn io_error(path: &Path, action: &str, e: &std::io::Error) -> StoreError {
    tracing::warn!(path = %path.display(), action, error = %e, "store file operation failed");
    StoreError::Io { reason: format!("failed to {action} {}: {e}", path.display()) }
}
