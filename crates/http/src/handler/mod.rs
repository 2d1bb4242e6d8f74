//! Request handler trait and adapters.
//!
//! A [`Handler`] turns a decoded request into a response. The connection loop
//! holds a handler behind an [`std::sync::Arc`] and invokes it once per
//! request; [`make_handler`] lifts a plain async function into a handler.

use async_trait::async_trait;
use bytes::Bytes;
use http::{Request, Response};
use std::error::Error;
use std::future::Future;

#[async_trait]
pub trait Handler: Send + Sync {
    async fn call(&self, req: Request<Bytes>) -> Result<Response<Bytes>, Box<dyn Error + Send + Sync>>;
}

#[derive(Debug)]
pub struct HandlerFn<F> {
    f: F,
}

#[async_trait]
impl<F, Fut, Err> Handler for HandlerFn<F>
where
    F: Fn(Request<Bytes>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response<Bytes>, Err>> + Send,
    Err: Into<Box<dyn Error + Send + Sync>>,
{
    async fn call(&self, req: Request<Bytes>) -> Result<Response<Bytes>, Box<dyn Error + Send + Sync>> {
        (self.f)(req).await.map_err(Into::into)
    }
}

pub fn make_handler<F, Fut, Err>(f: F) -> HandlerFn<F>
where
    F: Fn(Request<Bytes>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response<Bytes>, Err>> + Send,
    Err: Into<Box<dyn Error + Send + Sync>>,
{
    HandlerFn { f }
}
