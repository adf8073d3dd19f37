//! Profile endpoints.

use crate::{ProtoError, Request, request::path_segment};

/// Fetch the profile of `recipient_id`.
pub fn get_profile(recipient_id: &str) -> Result<Request, ProtoError> {
    let recipient_id = path_segment("recipient_id", recipient_id)?;
    Ok(Request::get(format!("/v1/profile/{recipient_id}")))
}

/// Fetch a signed upload form for the profile avatar.
pub fn profile_avatar_upload_form() -> Request {
    Request::get("/v1/profile/form/avatar")
}
