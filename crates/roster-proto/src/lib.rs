//! Roster protocol requests.
//!
//! Stateless construction of the requests a messaging client sends to the
//! service, plus the response payloads that feed back into the recipient
//! directory.
//!
//! # Architecture
//!
//! ```text
//! roster-proto
//!   ├─ Request      (method + path + query + JSON body, no I/O)
//!   ├─ factory      (one constructor per service endpoint)
//!   └─ payloads     (key shapes, per-device messages, device reports)
//! ```
//!
//! Every constructor takes plain values. Constructors that accept
//! identifiers validate them and return [`ProtoError`] for malformed input;
//! the rest are infallible.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod factory;
pub mod payloads;
pub mod request;

pub use error::ProtoError;
pub use payloads::{
    AccountAttributes, DeviceMessage, EnvelopeType, LinkedDevice, LinkedDevices,
    MismatchedDevices, PreKey, SignedPreKey, StaleDevices, VerificationTransport,
};
pub use request::{Method, Request};

/// Device id of the primary (registering) device of every account.
pub const PRIMARY_DEVICE_ID: u32 = 1;
