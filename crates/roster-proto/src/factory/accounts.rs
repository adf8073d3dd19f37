//! Account endpoints: registration lock, push tokens, attributes,
//! verification codes.

use serde_json::json;

use crate::{
    AccountAttributes, ProtoError, Request, VerificationTransport, request::path_segment,
};

/// Client identifier sent with verification code requests.
const CLIENT_NAME: &str = "ios";

/// Enable the registration lock with `pin`.
pub fn enable_two_factor(pin: &str) -> Result<Request, ProtoError> {
    if pin.is_empty() {
        return Err(ProtoError::EmptyParameter { name: "pin" });
    }
    Ok(Request::put("/v1/accounts/pin").with_body(json!({ "pin": pin })))
}

/// Disable the registration lock.
pub fn disable_two_factor() -> Request {
    Request::delete("/v1/accounts/pin")
}

/// Register push tokens. An empty `voip_token` is omitted from the body.
pub fn register_for_push(push_token: &str, voip_token: &str) -> Result<Request, ProtoError> {
    if push_token.is_empty() {
        return Err(ProtoError::EmptyParameter { name: "push_token" });
    }
    let mut body = json!({ "apnRegistrationId": push_token });
    if !voip_token.is_empty() {
        body["voipRegistrationId"] = json!(voip_token);
    }
    Ok(Request::put("/v1/accounts/apn").with_body(body))
}

/// Report the local account attributes.
pub fn update_attributes(attributes: &AccountAttributes) -> Result<Request, ProtoError> {
    let body = serde_json::to_value(attributes)?;
    Ok(Request::put("/v1/accounts/attributes").with_body(body))
}

/// Stop push delivery for this account.
pub fn unregister_account() -> Request {
    Request::delete("/v1/accounts/apn")
}

/// Ask the service to send a verification code to `phone_number`.
pub fn request_verification_code(
    phone_number: &str,
    transport: VerificationTransport,
) -> Result<Request, ProtoError> {
    let phone_number = path_segment("phone_number", phone_number)?;
    let path = format!("/v1/accounts/{}/code/{phone_number}", transport.path_component());
    Ok(Request::get(path).with_query("client", CLIENT_NAME))
}

/// Fetch TURN server credentials for calls.
pub fn turn_server_info() -> Request {
    Request::get("/v1/accounts/turn")
}
