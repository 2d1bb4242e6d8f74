//! The error taxonomy of the dispatch pipeline.
//!
//! Route and handler failures are values, never panics: the terminal endpoint
//! and the error-handling middleware convert a [`WebError`] into a structured
//! JSON response, so no error escapes the dispatcher into the serving loop.

use http::header::ALLOW;
use http::{HeaderValue, Method, StatusCode};
use std::error::Error;
use thiserror::Error;

use crate::response::Response;

#[derive(Debug, Error)]
pub enum WebError {
    #[error("no route matches the request path")]
    RouteNotFound,

    #[error("method not allowed, allowed: {allowed:?}")]
    MethodNotAllowed { allowed: Vec<Method> },

    #[error("invalid request: {reason}")]
    Validation { reason: String },

    #[error("handler error: {source}")]
    Handler {
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl WebError {
    pub fn validation<S: ToString>(reason: S) -> Self {
        Self::Validation { reason: reason.to_string() }
    }

    pub fn handler<E: Into<Box<dyn Error + Send + Sync>>>(e: E) -> Self {
        Self::Handler { source: e.into() }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Handler { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts the error into its structured response.
    ///
    /// Handler failures deliberately map to a generic message: the full cause
    /// is logged server side, never sent to the client.
    pub fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            Self::RouteNotFound => "Not found".to_string(),
            Self::MethodNotAllowed { .. } => "Method not allowed".to_string(),
            Self::Validation { reason } => reason.clone(),
            Self::Handler { .. } => "Internal server error".to_string(),
        };

        let response = Response::json(status, &serde_json::json!({ "error": message }));
        match self {
            Self::MethodNotAllowed { allowed } => match HeaderValue::from_str(&join_methods(&allowed)) {
                Ok(value) => response.with_header(ALLOW, value),
                Err(_) => response,
            },
            _ => response,
        }
    }
}

fn join_methods(methods: &[Method]) -> String {
    methods.iter().map(Method::as_str).collect::<Vec<_>>().join(", ")
}

/// Errors raised while building a route table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouterError {
    #[error("duplicate route: {method} {pattern}")]
    DuplicateRoute { method: Method, pattern: String },
}
