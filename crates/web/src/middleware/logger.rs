//! Request logging middleware.

use async_trait::async_trait;
use std::time::Instant;
use tracing::info;

use super::{Endpoint, Middleware};
use crate::error::WebError;
use crate::request::Request;
use crate::response::Response;

/// Logs one line per request: method, path, status and elapsed milliseconds.
#[derive(Debug, Default)]
pub struct Logger;

#[async_trait]
impl Middleware for Logger {
    async fn handle(&self, req: Request, next: &dyn Endpoint) -> Result<Response, WebError> {
        let method = req.method().clone();
        let path = req.path().to_string();
        let start = Instant::now();

        let result = next.call(req).await;

        let elapsed_ms = start.elapsed().as_millis();
        match &result {
            Ok(response) => {
                info!(%method, path, status = response.status().as_u16(), elapsed_ms, "request completed");
            }
            Err(e) => {
                info!(%method, path, cause = %e, elapsed_ms, "request errored");
            }
        }

        result
    }
}
