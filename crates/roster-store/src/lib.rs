//! Transactional stores for the roster directory.
//!
//! ## Architecture
//!
//! ```text
//! roster-store
//!   ├─ MemoryStore    (MVCC snapshots, single writer, optional CBOR file)
//!   └─ ChaoticStore   (MemoryStore + seeded fault injection)
//! ```
//!
//! Both implement [`roster_core::TransactionalStore`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod chaotic;
mod memory;

pub use chaotic::{ChaoticStore, ChaoticWrite};
pub use memory::{MemoryRead, MemoryStore, MemoryWrite};
