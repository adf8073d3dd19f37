//! Request construction errors.

use thiserror::Error;

/// Errors raised while building a request or decoding a service payload.
///
/// All variants describe caller mistakes or malformed service responses.
/// None of them are retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtoError {
    /// A required parameter was empty.
    #[error("missing parameter: {name}")]
    EmptyParameter {
        /// Name of the parameter.
        name: &'static str,
    },

    /// A value that is interpolated into the request path contains a path
    /// or query delimiter.
    #[error("invalid path segment for {name}: {value:?}")]
    InvalidPathSegment {
        /// Name of the parameter.
        name: &'static str,
        /// The rejected value.
        value: String,
    },

    /// Device ids are positive; zero is reserved.
    #[error("invalid device id: {device_id}")]
    InvalidDeviceId {
        /// The rejected id.
        device_id: u32,
    },

    /// A per-device message targets a different recipient than the request.
    #[error("message for {destination} submitted to {recipient_id}")]
    DestinationMismatch {
        /// Recipient the request is addressed to.
        recipient_id: String,
        /// Destination embedded in the message.
        destination: String,
    },

    /// JSON encoding or decoding failed.
    #[error("json error: {reason}")]
    Json {
        /// Description of the failure.
        reason: String,
    },
}

impl From<serde_json::Error> for ProtoError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json { reason: err.to_string() }
    }
}
