//! HTTP connection lifecycle management.
//!
//! [`HttpConnection`] owns the framed read and write halves of one transport
//! stream and serves requests on it sequentially: decode a request, invoke
//! the handler, encode the response, then either continue (keep-alive) or
//! shut the connection down.

use std::sync::Arc;

use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use http::header::CONNECTION;
use http::{Request, Response, StatusCode, Version};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{error, info};

use crate::codec::{RequestDecoder, ResponseEncoder};
use crate::handler::Handler;
use crate::protocol::HttpError;

/// An HTTP connection serving decoded requests through a [`Handler`]
///
/// # Type Parameters
///
/// * `R`: the async readable stream type
/// * `W`: the async writable stream type
pub struct HttpConnection<R, W> {
    framed_read: FramedRead<R, RequestDecoder>,
    framed_write: FramedWrite<W, ResponseEncoder>,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            framed_read: FramedRead::with_capacity(reader, RequestDecoder::new(), 8 * 1024),
            framed_write: FramedWrite::new(writer, ResponseEncoder::new()),
        }
    }

    /// Serves requests on this connection until the peer disconnects, the
    /// request asks for the connection to close, or decoding fails.
    pub async fn process<H>(mut self, handler: Arc<H>) -> Result<(), HttpError>
    where
        H: Handler,
    {
        loop {
            match self.framed_read.next().await {
                Some(Ok(request)) => {
                    let keep_alive = wants_keep_alive(&request);

                    let response = match handler.call(request).await {
                        Ok(response) => response,
                        Err(e) => {
                            error!(cause = %e, "handler error, sending internal server error");
                            build_error_response(StatusCode::INTERNAL_SERVER_ERROR)
                        }
                    };

                    self.framed_write.send(response).await.map_err(HttpError::from)?;

                    if !keep_alive {
                        info!("connection marked for close, shutting down");
                        return Ok(());
                    }
                }

                Some(Err(e)) => {
                    error!(cause = %e, "can't decode next request");
                    self.framed_write
                        .send(build_error_response(StatusCode::BAD_REQUEST))
                        .await
                        .map_err(HttpError::from)?;
                    return Err(e.into());
                }

                None => {
                    info!("no more requests, connection shutdown");
                    return Ok(());
                }
            }
        }
    }
}

/// HTTP/1.1 defaults to keep-alive unless the request says `close`;
/// HTTP/1.0 defaults to close unless the request says `keep-alive`.
fn wants_keep_alive(request: &Request<Bytes>) -> bool {
    let connection = request
        .headers()
        .get(CONNECTION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_ascii_lowercase);

    match request.version() {
        Version::HTTP_10 => connection.as_deref() == Some("keep-alive"),
        _ => connection.as_deref() != Some("close"),
    }
}

fn build_error_response(status_code: StatusCode) -> Response<Bytes> {
    let mut response = Response::new(Bytes::new());
    *response.status_mut() = status_code;
    response
}
