//! Declarative request descriptor.
//!
//! A [`Request`] says what to send, never how. The transport layer turns it
//! into an HTTP call; this crate never touches the network.

use std::{collections::BTreeMap, fmt};

use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;

use crate::ProtoError;

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// Fetch a resource.
    Get,
    /// Create or replace a resource.
    Put,
    /// Remove a resource.
    Delete,
}

impl Method {
    /// Upper-case wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outbound request descriptor.
///
/// Paths are absolute (`/v1/...`). The body, when present, is a JSON value
/// whose object keys serialize in sorted order, so two equal descriptors
/// always encode to the same bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Request {
    method: Method,
    path: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    query: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<Value>,
}

impl Request {
    pub(crate) fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), query: BTreeMap::new(), body: None }
    }

    pub(crate) fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub(crate) fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub(crate) fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub(crate) fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub(crate) fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.insert(key.to_string(), value.to_string());
        self
    }

    /// HTTP method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Absolute request path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query parameters, sorted by key.
    pub fn query(&self) -> &BTreeMap<String, String> {
        &self.query
    }

    /// JSON body, if the request carries one.
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Path plus query string. Keys and values are emitted as given, without
    /// percent-encoding.
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query: Vec<String> = self.query.iter().map(|(k, v)| format!("{k}={v}")).collect();
        format!("{}?{}", self.path, query.join("&"))
    }

    /// Encode the body for the transport. Requests without a body encode to
    /// an empty buffer.
    pub fn encode_body(&self) -> Result<Bytes, ProtoError> {
        match &self.body {
            Some(body) => Ok(Bytes::from(serde_json::to_vec(body)?)),
            None => Ok(Bytes::new()),
        }
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path_and_query())
    }
}

/// Validate a value that is interpolated into a request path.
pub(crate) fn path_segment<'a>(name: &'static str, value: &'a str) -> Result<&'a str, ProtoError> {
    if value.is_empty() {
        return Err(ProtoError::EmptyParameter { name });
    }
    if value.contains(['/', '?', '#']) {
        return Err(ProtoError::InvalidPathSegment { name, value: value.to_string() });
    }
    Ok(value)
}

/// Validate a device id.
pub(crate) fn device_id(device_id: u32) -> Result<u32, ProtoError> {
    if device_id == 0 {
        return Err(ProtoError::InvalidDeviceId { device_id });
    }
    Ok(device_id)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn display_includes_sorted_query() {
        let request = Request::get("/v1/things").with_query("z", "1").with_query("a", "2");
        assert_eq!(request.to_string(), "GET /v1/things?a=2&z=1");
    }

    #[test]
    fn query_values_are_not_escaped() {
        let request = Request::get("/v1/things").with_query("q", "a b+c");
        assert_eq!(request.path_and_query(), "/v1/things?q=a b+c");
        assert_eq!(Request::get("/v1/things").path_and_query(), "/v1/things");
    }

    #[test]
    fn method_wire_names() {
        let names: Vec<&str> =
            [Method::Get, Method::Put, Method::Delete].into_iter().map(Method::as_str).collect();
        assert_eq!(names, ["GET", "PUT", "DELETE"]);
        assert_eq!(serde_json::to_string(&Method::Delete).unwrap(), r#""DELETE""#);
    }

    #[test]
    fn encode_body_is_empty_without_body() {
        let request = Request::delete("/v1/things/1");
        assert!(request.encode_body().unwrap().is_empty());
    }

    #[test]
    fn encode_body_sorts_keys() {
        let request = Request::put("/v1/things").with_body(json!({"b": 1, "a": 2}));
        assert_eq!(&request.encode_body().unwrap()[..], br#"{"a":2,"b":1}"#);
    }

    #[test]
    fn path_segment_rejects_delimiters() {
        assert!(path_segment("id", "+15551234567").is_ok());
        assert_eq!(path_segment("id", ""), Err(ProtoError::EmptyParameter { name: "id" }));
        for bad in ["a/b", "a?b", "a#b"] {
            assert!(matches!(
                path_segment("id", bad),
                Err(ProtoError::InvalidPathSegment { .. })
            ));
        }
    }

    #[test]
    fn zero_device_id_rejected() {
        assert_eq!(device_id(0), Err(ProtoError::InvalidDeviceId { device_id: 0 }));
        assert_eq!(device_id(3), Ok(3));
    }
}
