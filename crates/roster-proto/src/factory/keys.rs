//! Prekey endpoints.

use serde_json::json;

use crate::{
    PreKey, ProtoError, Request, SignedPreKey,
    payloads::base64_bytes,
    request::{device_id, path_segment},
};

/// Count of one-time prekeys the service still holds for this account.
pub fn available_prekeys_count() -> Request {
    Request::get("/v2/keys")
}

/// Fetch the signed prekey currently registered for this account.
pub fn current_signed_prekey() -> Request {
    Request::get("/v2/keys/signed")
}

/// Fetch a prekey bundle for one device of a recipient, or for all of its
/// devices when `device` is `None`.
pub fn recipient_prekey(recipient_id: &str, device: Option<u32>) -> Result<Request, ProtoError> {
    let recipient_id = path_segment("recipient_id", recipient_id)?;
    let device = match device {
        Some(device) => device_id(device)?.to_string(),
        None => "*".to_string(),
    };
    Ok(Request::get(format!("/v2/keys/{recipient_id}/{device}")))
}

/// Rotate the signed prekey.
pub fn register_signed_prekey(signed_prekey: &SignedPreKey) -> Result<Request, ProtoError> {
    Ok(Request::put("/v2/keys/signed").with_body(serde_json::to_value(signed_prekey)?))
}

/// Upload a fresh batch of prekeys together with the identity key.
pub fn register_prekeys(
    prekeys: &[PreKey],
    identity_key: &[u8],
    signed_prekey: &SignedPreKey,
    last_resort: &PreKey,
) -> Result<Request, ProtoError> {
    if identity_key.is_empty() {
        return Err(ProtoError::EmptyParameter { name: "identity_key" });
    }
    let body = json!({
        "preKeys": prekeys,
        "lastResortKey": last_resort,
        "signedPreKey": signed_prekey,
        "identityKey": base64_bytes::encode(identity_key),
    });
    Ok(Request::put("/v2/keys/").with_body(body))
}
