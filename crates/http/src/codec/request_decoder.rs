//! HTTP request decoder
//!
//! Decodes complete HTTP/1.1 requests from a byte stream using a two phase
//! state machine:
//!
//! 1. Head parsing: method, uri, version and headers via `httparse`
//! 2. Body buffering: exactly `Content-Length` bytes
//!
//! The decoder yields a fully materialized `http::Request<Bytes>` once both
//! phases complete. `Transfer-Encoding` is not supported and fails decoding.

use crate::ensure;
use crate::protocol::ParseError;
use bytes::{Buf, Bytes, BytesMut};
use http::header::{CONTENT_LENGTH, TRANSFER_ENCODING};
use http::{HeaderName, HeaderValue, Method, Request, Uri, Version};
use tokio_util::codec::Decoder;
use tracing::trace;

/// Maximum number of headers allowed in a request
const MAX_HEADER_NUM: usize = 64;

/// Maximum size in bytes allowed for the entire header section
const MAX_HEADER_BYTES: usize = 8 * 1024;

/// A decoder for HTTP requests that handles both head and body
///
/// State is tracked through the `pending` field:
/// - `None`: currently parsing the request head
/// - `Some(PendingBody)`: head parsed, buffering the body
pub struct RequestDecoder {
    pending: Option<PendingBody>,
}

struct PendingBody {
    head: Request<()>,
    remaining: usize,
}

impl RequestDecoder {
    /// Creates a new `RequestDecoder` instance
    pub fn new() -> Self {
        Default::default()
    }
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl Decoder for RequestDecoder {
    type Item = Request<Bytes>;
    type Error = ParseError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let pending = match self.pending.take() {
            Some(pending) => pending,
            None => match decode_head(src)? {
                Some(pending) => pending,
                None => return Ok(None),
            },
        };

        if src.len() < pending.remaining {
            src.reserve(pending.remaining - src.len());
            self.pending = Some(pending);
            return Ok(None);
        }

        let body = src.split_to(pending.remaining).freeze();
        Ok(Some(pending.head.map(|()| body)))
    }
}

fn decode_head(src: &mut BytesMut) -> Result<Option<PendingBody>, ParseError> {
    // Fast path: minimum valid request is "GET / HTTP/1.1\r\n\r\n"
    if src.len() < 14 {
        return Ok(None);
    }

    let mut headers = [httparse::EMPTY_HEADER; MAX_HEADER_NUM];
    let mut parsed_req = httparse::Request::new(&mut headers);

    let parse_status = parsed_req.parse(src).map_err(|e| match e {
        httparse::Error::TooManyHeaders => ParseError::too_many_headers(MAX_HEADER_NUM),
        e => ParseError::invalid_header(e),
    })?;

    let body_offset = match parse_status {
        httparse::Status::Complete(body_offset) => body_offset,
        httparse::Status::Partial => {
            ensure!(src.len() <= MAX_HEADER_BYTES, ParseError::too_large_header(src.len(), MAX_HEADER_BYTES));
            return Ok(None);
        }
    };

    trace!(body_offset, "parsed request head");
    ensure!(body_offset <= MAX_HEADER_BYTES, ParseError::too_large_header(body_offset, MAX_HEADER_BYTES));

    let version = match parsed_req.version {
        Some(0) => Version::HTTP_10,
        Some(1) => Version::HTTP_11,
        version => return Err(ParseError::InvalidVersion(version)),
    };

    let method = parsed_req
        .method
        .ok_or(ParseError::InvalidMethod)
        .and_then(|m| Method::from_bytes(m.as_bytes()).map_err(|_| ParseError::InvalidMethod))?;

    let uri = parsed_req
        .path
        .ok_or(ParseError::InvalidUri)
        .and_then(|p| p.parse::<Uri>().map_err(|_| ParseError::InvalidUri))?;

    let mut head_builder = Request::builder().method(method).uri(uri).version(version);

    if let Some(header_map) = head_builder.headers_mut() {
        header_map.reserve(parsed_req.headers.len());
        for header in parsed_req.headers.iter() {
            let name = HeaderName::from_bytes(header.name.as_bytes()).map_err(ParseError::invalid_header)?;
            let value = HeaderValue::from_bytes(header.value).map_err(ParseError::invalid_header)?;
            header_map.append(name, value);
        }
    }

    let head = head_builder.body(()).map_err(ParseError::invalid_header)?;
    let remaining = body_length(&head)?;

    src.advance(body_offset);

    Ok(Some(PendingBody { head, remaining }))
}

/// Determines the body length according to the framing headers.
///
/// Only `Content-Length` framing is supported; requests carrying a
/// `Transfer-Encoding` header are rejected.
fn body_length(head: &Request<()>) -> Result<usize, ParseError> {
    if let Some(encoding) = head.headers().get(TRANSFER_ENCODING) {
        return Err(ParseError::unsupported_transfer_encoding(String::from_utf8_lossy(encoding.as_bytes())));
    }

    match head.headers().get(CONTENT_LENGTH) {
        Some(value) => value
            .to_str()
            .ok()
            .and_then(|s| s.trim().parse::<usize>().ok())
            .ok_or_else(|| ParseError::invalid_content_length(format!("{value:?}"))),
        None => Ok(0),
    }
}
