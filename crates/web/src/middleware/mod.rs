//! The middleware chain.
//!
//! A [`Middleware`] intercepts a request on its way to the terminal endpoint.
//! It receives the request and its continuation (`next`) and may proceed,
//! short-circuit with its own response, or wrap the inner result. The ordered
//! middleware list is folded into a single composed [`Endpoint`] once at
//! startup, so dispatching allocates nothing and captures no recursive
//! closures.
//!
//! Onion ordering: a middleware earlier in registration order wraps all later
//! ones and the terminal endpoint. For middlewares `[A, B]` and terminal `T`,
//! the before side runs A, B, T and the after side unwinds T, B, A.
//!
//! Built-in middleware:
//!
//! - [`ErrorHandler`]: earliest in the chain; converts propagated [`WebError`]s
//!   into structured responses so no error escapes the dispatcher
//! - [`Logger`]: logs method, path, status and elapsed time
//! - [`Cors`]: wildcard CORS headers and OPTIONS preflight short-circuit

mod cors;
mod error_handler;
mod logger;

pub use cors::Cors;
pub use error_handler::ErrorHandler;
pub use logger::Logger;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::WebError;
use crate::request::Request;
use crate::response::Response;

/// A fully composed request entry point
#[async_trait]
pub trait Endpoint: Send + Sync {
    async fn call(&self, req: Request) -> Result<Response, WebError>;
}

/// A request interceptor.
///
/// `next` may be invoked zero times (short-circuit) or once (proceed); the
/// request moves into the continuation, so invoking it twice is not
/// expressible.
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn handle(&self, req: Request, next: &dyn Endpoint) -> Result<Response, WebError>;
}

/// One composed link: a middleware plus the rest of the chain
struct Link {
    middleware: Arc<dyn Middleware>,
    next: Arc<dyn Endpoint>,
}

#[async_trait]
impl Endpoint for Link {
    async fn call(&self, req: Request) -> Result<Response, WebError> {
        self.middleware.handle(req, self.next.as_ref()).await
    }
}

/// Folds the ordered middleware list around the terminal endpoint.
///
/// The fold runs right to left so the first middleware ends up outermost.
pub fn compose(middlewares: Vec<Arc<dyn Middleware>>, terminal: Arc<dyn Endpoint>) -> Arc<dyn Endpoint> {
    middlewares
        .into_iter()
        .rev()
        .fold(terminal, |next, middleware| Arc::new(Link { middleware, next }) as Arc<dyn Endpoint>)
}
