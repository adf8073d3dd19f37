//! Recipient and device directory.
//!
//! A local cache of which recipients the messaging service reports as
//! registered, and which devices each of them has linked. The directory is a
//! thin layer over a transactional key-value store: every read takes a read
//! transaction, every mutation takes a write transaction, and the store alone
//! is responsible for isolation between concurrent callers.
//!
//! ## Architecture
//!
//! ```text
//! roster-core
//!   ├─ RecipientDirectory   (lookup, registration transitions, feedback)
//!   ├─ RecipientRecord      (recipient id + device set, add/remove devices)
//!   ├─ DeviceSet            (insertion-ordered set of device ids)
//!   ├─ LocalAccount         (lazily resolved identity of this client)
//!   ├─ codec                (CBOR record encoding)
//!   └─ store                (transactional store contract)
//! ```
//!
//! ## Registration state
//!
//! There is no registration flag. A record that exists in the store IS a
//! registered account; a missing record is an unknown or deregistered one.
//!
//! ```text
//!            mark_account_as_registered
//!   Unknown ────────────────────────────▶ Registered ──┐ add/remove devices
//!      ▲                                      │   ◀────┘
//!      └──────────────────────────────────────┘
//!            mark_account_as_not_registered
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod account;
pub mod codec;
pub mod device;
pub mod directory;
pub mod error;
pub mod recipient;
pub mod store;

pub use account::{LocalAccount, LocalIdentity};
pub use device::{DeviceId, DeviceSet, InvalidDeviceId};
pub use directory::RecipientDirectory;
pub use error::DirectoryError;
pub use recipient::{InvalidRecipientId, RecipientId, RecipientRecord};
pub use store::{ReadTransaction, StoreError, TransactionalStore, WriteTransaction};
