//! CLI errors.

use roster_core::{DirectoryError, StoreError};
use roster_proto::ProtoError;
use thiserror::Error;

/// Errors a command can end with.
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument is not a recipient id.
    #[error("invalid recipient id: {value:?}")]
    InvalidRecipient {
        /// The rejected argument.
        value: String,
    },

    /// Argument is not a device id.
    #[error("invalid device id: {value}")]
    InvalidDevice {
        /// The rejected argument.
        value: u32,
    },

    /// Directory operation failed.
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// Opening the store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Request construction failed.
    #[error(transparent)]
    Request(#[from] ProtoError),

    /// Writing output failed.
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),

    /// Rendering a request failed.
    #[error("render error: {0}")]
    Render(#[from] serde_json::Error),
}
