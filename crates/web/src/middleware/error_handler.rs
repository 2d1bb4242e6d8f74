//! Error-handling middleware.
//!
//! Placed earliest in the chain so every error raised by later middleware or
//! the terminal handler is converted into a structured response before it can
//! reach the serving loop.

use async_trait::async_trait;
use tracing::{error, warn};

use super::{Endpoint, Middleware};
use crate::error::WebError;
use crate::request::Request;
use crate::response::Response;

#[derive(Debug, Default)]
pub struct ErrorHandler;

#[async_trait]
impl Middleware for ErrorHandler {
    async fn handle(&self, req: Request, next: &dyn Endpoint) -> Result<Response, WebError> {
        let method = req.method().clone();
        let path = req.path().to_string();

        match next.call(req).await {
            Ok(response) => Ok(response),
            Err(e) => {
                match &e {
                    WebError::Handler { source } => {
                        error!(%method, path, cause = %source, "unhandled handler error");
                    }
                    other => {
                        warn!(%method, path, cause = %other, "request failed");
                    }
                }
                Ok(e.into_response())
            }
        }
    }
}
