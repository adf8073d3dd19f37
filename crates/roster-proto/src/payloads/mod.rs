//! Payload types carried in request bodies and service responses.

mod accounts;
mod devices;
mod keys;
mod messages;

pub use accounts::{AccountAttributes, VerificationTransport};
pub use devices::{LinkedDevice, LinkedDevices, MismatchedDevices, StaleDevices};
pub use keys::{PreKey, SignedPreKey};
pub use messages::{DeviceMessage, EnvelopeType};

/// Binary fields travel as standard base64 strings.
pub(crate) mod base64_bytes {
    use base64::{Engine, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(D::Error::custom)
    }

    pub fn encode(bytes: &[u8]) -> String {
        STANDARD.encode(bytes)
    }
}
