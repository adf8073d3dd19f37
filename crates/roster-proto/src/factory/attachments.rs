//! Attachment endpoints.

use crate::Request;

/// Allocate an upload slot for a new attachment.
pub fn allocate_attachment() -> Request {
    Request::get("/v1/attachments/")
}

/// Fetch the download location of an attachment.
pub fn attachment(attachment_id: u64) -> Request {
    Request::get(format!("/v1/attachments/{attachment_id}"))
}
