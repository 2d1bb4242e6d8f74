//! Standalone server deployment.
//!
//! Runs a [`Dispatcher`] on a TCP listener via the `rill-http` connection
//! loop. Connections are served concurrently (one task per connection), so
//! anything handlers share — like the todo store — must carry its own guard.

use async_trait::async_trait;
use bytes::Bytes;
use std::error::Error;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use rill_http::connection::HttpConnection;
use rill_http::handler::Handler;

use crate::dispatcher::Dispatcher;
use crate::request::Request;
use crate::response::Response;

pub struct ServerBuilder {
    dispatcher: Option<Dispatcher>,
    address: Option<String>,
}

impl ServerBuilder {
    fn new() -> Self {
        Self { dispatcher: None, address: None }
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn dispatcher(mut self, dispatcher: Dispatcher) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub fn build(self) -> Result<Server, ServerBuildError> {
        let dispatcher = self.dispatcher.ok_or(ServerBuildError::MissingDispatcher)?;
        let address = self.address.ok_or(ServerBuildError::MissingAddress)?;
        Ok(Server { dispatcher, address })
    }
}

#[derive(Error, Debug)]
pub enum ServerBuildError {
    #[error("dispatcher must be set")]
    MissingDispatcher,
    #[error("address must be set")]
    MissingAddress,
}

pub struct Server {
    dispatcher: Dispatcher,
    address: String,
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    pub async fn start(self) -> Result<(), std::io::Error> {
        let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
        tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

        info!("start listening at {}", self.address);
        let tcp_listener = match TcpListener::bind(self.address.as_str()).await {
            Ok(tcp_listener) => tcp_listener,
            Err(e) => {
                error!(cause = %e, "bind server error");
                return Err(e);
            }
        };

        let handler = Arc::new(DispatchHandler { dispatcher: self.dispatcher });
        loop {
            let (tcp_stream, _remote_addr) = match tcp_listener.accept().await {
                Ok(stream_and_addr) => stream_and_addr,
                Err(e) => {
                    warn!(cause = %e, "failed to accept");
                    continue;
                }
            };

            let handler = handler.clone();

            tokio::spawn(async move {
                let (reader, writer) = tcp_stream.into_split();
                let connection = HttpConnection::new(reader, writer);
                match connection.process(handler).await {
                    Ok(()) => {
                        info!("finished process, connection shutdown");
                    }
                    Err(e) => {
                        error!(cause = %e, "connection error, connection shutdown");
                    }
                }
            });
        }
    }
}

/// Bridges decoded wire requests into the canonical model and back
struct DispatchHandler {
    dispatcher: Dispatcher,
}

#[async_trait]
impl Handler for DispatchHandler {
    async fn call(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>, Box<dyn Error + Send + Sync>> {
        let response = self.dispatcher.dispatch(canonical_request(req)).await?;
        Ok(response.into())
    }
}

fn canonical_request(req: http::Request<Bytes>) -> Request {
    let (parts, body) = req.into_parts();

    let mut request = Request::new(parts.method, parts.uri.path());
    if let Some(query) = parts.uri.query() {
        request = request.with_query_string(query);
    }
    request = request.with_headers(parts.headers);
    if !body.is_empty() {
        request = request.with_body(body);
    }
    request
}
