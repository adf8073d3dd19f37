//! Contact discovery.

use serde_json::json;

use crate::Request;

/// Intersect hashed contact identifiers with the service's registered
/// accounts. The response lists the hashes that are registered.
pub fn contacts_intersection(hashes: &[String]) -> Request {
    Request::put("/v1/directory/tokens").with_body(json!({ "contacts": hashes }))
}
