//! Message endpoints.

use serde_json::json;

use crate::{
    DeviceMessage, ProtoError, Request,
    request::{device_id, path_segment},
};

/// Fetch queued messages.
pub fn get_messages() -> Request {
    Request::get("/v1/messages")
}

/// Remove a delivered message from the service queue.
pub fn acknowledge_message_delivery(source: &str, timestamp: u64) -> Result<Request, ProtoError> {
    let source = path_segment("source", source)?;
    Ok(Request::delete(format!("/v1/messages/{source}/{timestamp}")))
}

/// Submit one ciphertext per device of `recipient_id`.
///
/// Every message must be addressed to `recipient_id` and to a valid device.
/// The service answers a device set that does not match its own with a
/// mismatched or stale devices report.
pub fn submit_message(
    recipient_id: &str,
    messages: &[DeviceMessage],
    timestamp: u64,
) -> Result<Request, ProtoError> {
    let recipient_id = path_segment("recipient_id", recipient_id)?;
    if messages.is_empty() {
        return Err(ProtoError::EmptyParameter { name: "messages" });
    }
    for message in messages {
        if message.destination != recipient_id {
            return Err(ProtoError::DestinationMismatch {
                recipient_id: recipient_id.to_string(),
                destination: message.destination.clone(),
            });
        }
        device_id(message.destination_device_id)?;
    }
    Ok(Request::put(format!("/v1/messages/{recipient_id}"))
        .with_body(json!({ "messages": messages, "timestamp": timestamp })))
}
