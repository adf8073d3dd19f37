//! Directory errors.

use thiserror::Error;

use crate::{RecipientId, StoreError};

/// Errors raised by directory operations.
///
/// Absence of a record is never an error; lookups return `Option`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// The store failed. Passed through unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A persisted record could not be encoded or decoded.
    #[error("record for {key} is unreadable: {reason}")]
    Codec {
        /// Store key of the record.
        key: String,
        /// Decoder message.
        reason: String,
    },

    /// Device mutation on a record that has not been saved.
    #[error("recipient {recipient_id} is not registered")]
    NotRegistered {
        /// The unsaved recipient.
        recipient_id: RecipientId,
    },

    /// A record decoded under one key names a different recipient.
    #[error("record stored under {key} belongs to {embedded}")]
    KeyMismatch {
        /// Key the record was read from.
        key: String,
        /// Recipient id inside the record.
        embedded: String,
    },
}

impl DirectoryError {
    /// Returns true if retrying the transaction cannot help.
    ///
    /// Only transient store failures are retryable. Everything else is either
    /// corrupt data or a caller bug.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Store(e) => !e.is_transient(),
            Self::Codec { .. } | Self::NotRegistered { .. } | Self::KeyMismatch { .. } => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transient_store_errors_are_retryable() {
        let io: DirectoryError = StoreError::Io { reason: "disk".into() }.into();
        assert!(!io.is_fatal());

        let codec: DirectoryError = StoreError::Codec { reason: "bad".into() }.into();
        assert!(codec.is_fatal());

        let unregistered =
            DirectoryError::NotRegistered { recipient_id: RecipientId::new("+1555").unwrap() };
        assert!(unregistered.is_fatal());
        assert_eq!(unregistered.to_string(), "recipient +1555 is not registered");
    }

    #[test]
    fn store_errors_display_unchanged() {
        let inner = StoreError::Io { reason: "disk full".into() };
        assert_eq!(DirectoryError::from(inner.clone()).to_string(), inner.to_string());
    }
}
