//! A minimal asynchronous HTTP/1.1 serving layer
//!
//! This crate provides just enough HTTP/1.1 to host a request dispatcher on a
//! TCP listener: a request decoder, a response encoder and a per-connection
//! processing loop, all built on tokio and tokio-util codecs.
//!
//! Request and response bodies are complete [`bytes::Bytes`] values. Bodies are
//! framed by `Content-Length` only; `Transfer-Encoding: chunked` is rejected
//! during decoding, as streaming bodies are out of scope for this server.
//!
//! # Example
//!
//! ```no_run
//! use bytes::Bytes;
//! use http::{Request, Response, StatusCode};
//! use std::error::Error;
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//! use rill_http::connection::HttpConnection;
//! use rill_http::handler::make_handler;
//!
//! #[tokio::main]
//! async fn main() {
//!     let tcp_listener = TcpListener::bind("127.0.0.1:8080").await.unwrap();
//!     let handler = Arc::new(make_handler(hello_world));
//!
//!     loop {
//!         let (tcp_stream, _remote_addr) = match tcp_listener.accept().await {
//!             Ok(stream_and_addr) => stream_and_addr,
//!             Err(_) => continue,
//!         };
//!
//!         let handler = handler.clone();
//!         tokio::spawn(async move {
//!             let (reader, writer) = tcp_stream.into_split();
//!             let _ = HttpConnection::new(reader, writer).process(handler).await;
//!         });
//!     }
//! }
//!
//! async fn hello_world(_request: Request<Bytes>) -> Result<Response<Bytes>, Box<dyn Error + Send + Sync>> {
//!     let response = Response::builder()
//!         .status(StatusCode::OK)
//!         .body(Bytes::from_static(b"Hello World!\r\n"))
//!         .unwrap();
//!     Ok(response)
//! }
//! ```
//!
//! # Modules
//!
//! - [`codec`]: request decoding and response encoding
//! - [`connection`]: connection lifecycle management
//! - [`handler`]: the request handler trait and adapters
//! - [`protocol`]: protocol level errors

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;

mod utils;

pub(crate) use utils::ensure;
