//! Request decoding and response encoding.
//!
//! Both sides are implemented as tokio-util codecs so a connection can wrap
//! its transport halves in [`tokio_util::codec::FramedRead`] and
//! [`tokio_util::codec::FramedWrite`]:
//!
//! - [`RequestDecoder`]: decodes a complete `http::Request<Bytes>` from the wire
//! - [`ResponseEncoder`]: encodes a complete `http::Response<Bytes>` to the wire

mod request_decoder;
mod response_encoder;

pub use request_decoder::RequestDecoder;
pub use response_encoder::ResponseEncoder;
