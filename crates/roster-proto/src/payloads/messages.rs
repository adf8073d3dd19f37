//! Per-device message payloads.

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

/// Envelope type of an encrypted message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum EnvelopeType {
    /// Type not known to this client.
    Unknown = 0,
    /// Message encrypted with an established session.
    Ciphertext = 1,
    /// Legacy key exchange message.
    KeyExchange = 2,
    /// First message of a session, carries the prekey bundle.
    PrekeyBundle = 3,
    /// Delivery receipt.
    Receipt = 5,
}

/// Ciphertext addressed to one device of a recipient.
///
/// A message submission carries one of these per device in the recipient's
/// device set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceMessage {
    /// Envelope type.
    #[serde(rename = "type")]
    pub envelope_type: EnvelopeType,
    /// Recipient id.
    pub destination: String,
    /// Target device.
    pub destination_device_id: u32,
    /// Registration id of the target device's session.
    pub destination_registration_id: u32,
    /// Encrypted content.
    #[serde(with = "super::base64_bytes")]
    pub content: Vec<u8>,
    /// Silent messages do not trigger a notification.
    #[serde(default)]
    pub silent: bool,
}
