//! Prekey shapes uploaded to and fetched from the key service.
//!
//! Only the wire shape lives here; generating and signing keys is the
//! caller's job.

use serde::{Deserialize, Serialize};

/// One-time prekey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreKey {
    /// Key id assigned by the client.
    pub key_id: u32,
    /// Serialized public key.
    #[serde(with = "super::base64_bytes")]
    pub public_key: Vec<u8>,
}

/// Medium-term prekey signed by the identity key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedPreKey {
    /// Key id assigned by the client.
    pub key_id: u32,
    /// Serialized public key.
    #[serde(with = "super::base64_bytes")]
    pub public_key: Vec<u8>,
    /// Identity-key signature over `public_key`.
    #[serde(with = "super::base64_bytes")]
    pub signature: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_prekey_uses_base64_fields() {
        let key = SignedPreKey { key_id: 7, public_key: vec![1, 2, 3], signature: vec![255] };
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, r#"{"keyId":7,"publicKey":"AQID","signature":"/w=="}"#);
        let parsed: SignedPreKey = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn invalid_base64_rejected() {
        let result = serde_json::from_str::<PreKey>(r#"{"keyId":1,"publicKey":"***"}"#);
        assert!(result.is_err());
    }
}
