//! Linked device endpoints.
//!
//! Provisioning is the two-step handshake that links a new device: the
//! primary fetches a provisioning code, then submits the encrypted
//! provisioning message to the new device's ephemeral address.

use serde_json::json;

use crate::{
    ProtoError, Request,
    payloads::base64_bytes,
    request::{device_id, path_segment},
};

/// Unlink a device from the local account.
pub fn delete_device(device: u32) -> Result<Request, ProtoError> {
    let device = device_id(device)?;
    Ok(Request::delete(format!("/v1/devices/{device}")))
}

/// List the devices linked to the local account.
pub fn get_devices() -> Request {
    Request::get("/v1/devices/")
}

/// Fetch a one-time code authorizing a new device link.
pub fn device_provisioning_code() -> Request {
    Request::get("/v1/devices/provisioning/code")
}

/// Deliver the encrypted provisioning message to a device being linked.
pub fn device_provisioning(
    message_body: &[u8],
    ephemeral_device_id: &str,
) -> Result<Request, ProtoError> {
    if message_body.is_empty() {
        return Err(ProtoError::EmptyParameter { name: "message_body" });
    }
    let ephemeral_device_id = path_segment("ephemeral_device_id", ephemeral_device_id)?;
    Ok(Request::put(format!("/v1/provisioning/{ephemeral_device_id}"))
        .with_body(json!({ "body": base64_bytes::encode(message_body) })))
}
