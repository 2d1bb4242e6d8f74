//! CORS middleware.
//!
//! Mirrors a permissive browser policy: a wildcard origin, a fixed method
//! list, and an OPTIONS preflight short-circuit answered with 200.

use async_trait::async_trait;
use http::header::{ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN};
use http::{HeaderValue, Method, StatusCode};

use super::{Endpoint, Middleware};
use crate::error::WebError;
use crate::request::Request;
use crate::response::Response;

#[derive(Debug)]
pub struct Cors {
    allow_origin: HeaderValue,
    allow_methods: HeaderValue,
    allow_headers: HeaderValue,
}

impl Default for Cors {
    fn default() -> Self {
        Self {
            allow_origin: HeaderValue::from_static("*"),
            allow_methods: HeaderValue::from_static("GET,HEAD,PUT,PATCH,POST,DELETE"),
            allow_headers: HeaderValue::from_static("content-type"),
        }
    }
}

impl Cors {
    fn apply(&self, mut response: Response) -> Response {
        let headers = response.headers_mut();
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, self.allow_origin.clone());
        headers.insert(ACCESS_CONTROL_ALLOW_METHODS, self.allow_methods.clone());
        headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, self.allow_headers.clone());
        response
    }
}

#[async_trait]
impl Middleware for Cors {
    async fn handle(&self, req: Request, next: &dyn Endpoint) -> Result<Response, WebError> {
        if req.method() == Method::OPTIONS {
            return Ok(self.apply(Response::empty(StatusCode::OK)));
        }

        let response = next.call(req).await?;
        Ok(self.apply(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::compose;
    use std::sync::Arc;

    struct Terminal;

    #[async_trait]
    impl Endpoint for Terminal {
        async fn call(&self, _req: Request) -> Result<Response, WebError> {
            Ok(Response::empty(StatusCode::OK))
        }
    }

    #[tokio::test]
    async fn options_preflight_short_circuits_with_200() {
        let chain = compose(vec![Arc::new(Cors::default())], Arc::new(Terminal));

        let response = chain.call(Request::new(Method::OPTIONS, "/todos")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN), Some(&HeaderValue::from_static("*")));
    }

    #[tokio::test]
    async fn responses_carry_cors_headers() {
        let chain = compose(vec![Arc::new(Cors::default())], Arc::new(Terminal));

        let response = chain.call(Request::new(Method::GET, "/todos")).await.unwrap();

        assert_eq!(response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN), Some(&HeaderValue::from_static("*")));
        assert!(response.headers().contains_key(ACCESS_CONTROL_ALLOW_METHODS));
    }
}
