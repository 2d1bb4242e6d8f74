//! The runtime-API control-plane client.
//!
//! The control plane is plain HTTP: long-poll `GET .../invocation/next` for
//! work, then `POST` the outcome to the invocation's `response` or `error`
//! endpoint. [`RuntimeApi`] is the seam the invocation loop is tested
//! against; [`HttpRuntimeClient`] is the real implementation.

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use tracing::debug;

use crate::error::LambdaError;
use crate::event::{ErrorEnvelope, ResponseEnvelope};

const API_VERSION: &str = "2018-06-01";
const REQUEST_ID_HEADER: &str = "lambda-runtime-aws-request-id";

/// One unit of work handed out by the control plane.
#[derive(Debug)]
pub struct Invocation {
    pub request_id: String,
    pub payload: Bytes,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RuntimeApi: Send + Sync {
    /// Blocks until the control plane hands out the next invocation.
    async fn next_invocation(&self) -> Result<Invocation, LambdaError>;

    /// Posts the success envelope for an invocation.
    async fn send_response(&self, request_id: &str, envelope: &ResponseEnvelope) -> Result<(), LambdaError>;

    /// Posts the failure envelope for an invocation.
    async fn send_error(&self, request_id: &str, envelope: &ErrorEnvelope) -> Result<(), LambdaError>;
}

pub struct HttpRuntimeClient {
    client: Client<HttpConnector, Full<Bytes>>,
    endpoint: String,
}

impl HttpRuntimeClient {
    /// Builds a client against a control endpoint in `host[:port]` form.
    pub fn new(endpoint: impl Into<String>) -> Self {
        let client = Client::builder(TokioExecutor::new()).build_http();
        Self { client, endpoint: endpoint.into() }
    }

    async fn post_json(&self, uri: String, payload: Vec<u8>) -> Result<(), LambdaError> {
        let request = http::Request::builder()
            .method(http::Method::POST)
            .uri(uri.parse::<hyper::Uri>().map_err(LambdaError::transport)?)
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(payload)))
            .map_err(LambdaError::transport)?;

        let response = self.client.request(request).await.map_err(LambdaError::transport)?;
        if !response.status().is_success() {
            return Err(LambdaError::transport(format!("control plane answered {}", response.status())));
        }
        Ok(())
    }
}

#[async_trait]
impl RuntimeApi for HttpRuntimeClient {
    async fn next_invocation(&self) -> Result<Invocation, LambdaError> {
        let uri = format!("http://{}/{}/runtime/invocation/next", self.endpoint, API_VERSION);
        let request = http::Request::builder()
            .method(http::Method::GET)
            .uri(uri.parse::<hyper::Uri>().map_err(LambdaError::transport)?)
            .body(Full::default())
            .map_err(LambdaError::transport)?;

        let response = self.client.request(request).await.map_err(LambdaError::transport)?;

        let request_id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or(LambdaError::MissingRequestId)?;

        let payload = response.into_body().collect().await.map_err(LambdaError::transport)?.to_bytes();
        debug!(request_id = %request_id, bytes = payload.len(), "received invocation");

        Ok(Invocation { request_id, payload })
    }

    async fn send_response(&self, request_id: &str, envelope: &ResponseEnvelope) -> Result<(), LambdaError> {
        let uri = format!("http://{}/{}/runtime/invocation/{}/response", self.endpoint, API_VERSION, request_id);
        self.post_json(uri, serde_json::to_vec(envelope)?).await
    }

    async fn send_error(&self, request_id: &str, envelope: &ErrorEnvelope) -> Result<(), LambdaError> {
        let uri = format!("http://{}/{}/runtime/invocation/{}/error", self.endpoint, API_VERSION, request_id);
        self.post_json(uri, serde_json::to_vec(envelope)?).await
    }
}
