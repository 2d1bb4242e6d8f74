//! The canonical response model.

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use serde::Serialize;
use tracing::error;

/// A canonical HTTP response: status, headers and a complete body.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl Response {
    /// Creates a response with the given status and an empty body
    pub fn empty(status: StatusCode) -> Self {
        Self { status, headers: HeaderMap::new(), body: Bytes::new() }
    }

    /// Creates a JSON response from a serializable payload.
    ///
    /// Serialization of the payload types used in this crate cannot fail; if
    /// a foreign payload does fail, the response degrades to a 500 with a
    /// generic error body instead of panicking.
    pub fn json<T: Serialize>(status: StatusCode, payload: &T) -> Self {
        match serde_json::to_vec(payload) {
            Ok(body) => {
                let mut response = Self { status, headers: HeaderMap::new(), body: Bytes::from(body) };
                response.headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                response
            }
            Err(e) => {
                error!(cause = %e, "failed to serialize response payload");
                let mut response = Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    headers: HeaderMap::new(),
                    body: Bytes::from_static(br#"{"error":"Internal server error"}"#),
                };
                response.headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                response
            }
        }
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }
}

impl From<Response> for http::Response<Bytes> {
    fn from(response: Response) -> Self {
        let mut http_response = http::Response::new(response.body);
        *http_response.status_mut() = response.status;
        *http_response.headers_mut() = response.headers;
        http_response
    }
}
