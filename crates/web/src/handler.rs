//! Route handler trait and adapters.

use async_trait::async_trait;
use std::future::Future;

use crate::error::WebError;
use crate::request::Request;
use crate::response::Response;

/// The terminal unit of the dispatch pipeline: turns a matched request into a
/// response. Errors propagate back through the middleware chain.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn handle(&self, req: Request) -> Result<Response, WebError>;
}

/// An async function or closure lifted into a [`RequestHandler`]
pub struct FnHandler<F> {
    f: F,
}

#[async_trait]
impl<F, Fut> RequestHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response, WebError>> + Send,
{
    async fn handle(&self, req: Request) -> Result<Response, WebError> {
        (self.f)(req).await
    }
}

pub fn handler_fn<F, Fut>(f: F) -> FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response, WebError>> + Send,
{
    FnHandler { f }
}
