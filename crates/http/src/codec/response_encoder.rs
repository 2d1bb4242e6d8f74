//! HTTP response encoder
//!
//! Serializes a complete `http::Response<Bytes>` into its wire format: status
//! line, header section, then the body. A `Content-Length` header is written
//! automatically when the response carries none, so handlers never need to
//! frame their own bodies.

use crate::protocol::SendError;
use bytes::{Bytes, BytesMut};
use http::Response;
use http::header::CONTENT_LENGTH;
use tokio_util::codec::Encoder;

// small enough to cover the status line and a handful of headers without
// reallocating mid-encode
const HEAD_RESERVE_BYTES: usize = 256;

/// An encoder for complete HTTP responses
pub struct ResponseEncoder;

impl ResponseEncoder {
    /// Creates a new `ResponseEncoder` instance
    pub fn new() -> Self {
        Default::default()
    }
}

impl Default for ResponseEncoder {
    fn default() -> Self {
        Self
    }
}

impl Encoder<Response<Bytes>> for ResponseEncoder {
    type Error = SendError;

    fn encode(&mut self, response: Response<Bytes>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let (parts, body) = response.into_parts();

        dst.reserve(HEAD_RESERVE_BYTES + body.len());

        dst.extend_from_slice(b"HTTP/1.1 ");
        dst.extend_from_slice(parts.status.as_str().as_bytes());
        dst.extend_from_slice(b" ");
        dst.extend_from_slice(parts.status.canonical_reason().unwrap_or("Unknown").as_bytes());
        dst.extend_from_slice(b"\r\n");

        for (name, value) in parts.headers.iter() {
            dst.extend_from_slice(name.as_str().as_bytes());
            dst.extend_from_slice(b": ");
            dst.extend_from_slice(value.as_bytes());
            dst.extend_from_slice(b"\r\n");
        }

        if !parts.headers.contains_key(CONTENT_LENGTH) {
            dst.extend_from_slice(b"content-length: ");
            dst.extend_from_slice(body.len().to_string().as_bytes());
            dst.extend_from_slice(b"\r\n");
        }

        dst.extend_from_slice(b"\r\n");
        dst.extend_from_slice(&body);

        Ok(())
    }
}
