//! Account registration payloads.

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

/// Channel used to deliver a verification code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum VerificationTransport {
    /// Automated voice call.
    Voice = 1,
    /// Text message.
    Sms = 2,
}

impl VerificationTransport {
    /// Path component the service expects for this transport.
    pub fn path_component(self) -> &'static str {
        match self {
            Self::Voice => "voice",
            Self::Sms => "sms",
        }
    }
}

/// Attributes the client reports about its own account.
///
/// # Security
///
/// - **Debug Redaction**: `signaling_key` and `pin` never appear in `Debug`
///   output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountAttributes {
    /// Key the service uses to encrypt websocket envelopes.
    #[serde(with = "super::base64_bytes")]
    pub signaling_key: Vec<u8>,
    /// Local registration id (changes on reinstall).
    pub registration_id: u32,
    /// True when the client polls for messages instead of receiving pushes.
    pub fetches_messages: bool,
    /// Client supports voice calls.
    pub voice: bool,
    /// Client supports video calls.
    pub video: bool,
    /// Registration lock PIN, when two-factor is enabled.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub pin: Option<String>,
}

impl std::fmt::Debug for AccountAttributes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountAttributes")
            .field("signaling_key", &format!("<redacted {} bytes>", self.signaling_key.len()))
            .field("registration_id", &self.registration_id)
            .field("fetches_messages", &self.fetches_messages)
            .field("voice", &self.voice)
            .field("video", &self.video)
            .field("pin", &self.pin.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
