//! The dispatcher: resolves a request to a response.
//!
//! The dispatcher owns the composed middleware chain whose terminal step is
//! route-table lookup and handler invocation. Both the route table and the
//! middleware list are fixed when the dispatcher is built; dispatching holds
//! no mutable state.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::WebError;
use crate::middleware::{Endpoint, Middleware, compose};
use crate::request::Request;
use crate::response::Response;
use crate::router::{RouteMatch, Router};

/// The terminal endpoint: looks up the route and invokes its handler.
///
/// Unroutable requests become structured 404/405 responses right here, so a
/// dispatcher without any middleware still answers them; handler errors
/// propagate outwards for the error-handling middleware.
struct RouterEndpoint {
    router: Router,
}

#[async_trait]
impl Endpoint for RouterEndpoint {
    async fn call(&self, mut req: Request) -> Result<Response, WebError> {
        match self.router.at(req.method(), req.path()) {
            RouteMatch::Found { handler, params } => {
                req.set_path_params(params);
                handler.handle(req).await
            }
            RouteMatch::MethodNotAllowed { allowed } => Ok(WebError::MethodNotAllowed { allowed }.into_response()),
            RouteMatch::NotFound => Ok(WebError::RouteNotFound.into_response()),
        }
    }
}

/// Dispatches canonical requests through the middleware chain and route table
pub struct Dispatcher {
    chain: Arc<dyn Endpoint>,
}

impl Dispatcher {
    /// Creates a dispatcher builder around a route table
    pub fn builder(router: Router) -> DispatcherBuilder {
        DispatcherBuilder { router, middlewares: Vec::new() }
    }

    /// Resolves a request to a response.
    ///
    /// With an [`crate::middleware::ErrorHandler`] composed into the chain
    /// this never returns `Err`; without one, handler errors surface to the
    /// caller.
    pub async fn dispatch(&self, req: Request) -> Result<Response, WebError> {
        self.chain.call(req).await
    }
}

pub struct DispatcherBuilder {
    router: Router,
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl DispatcherBuilder {
    /// Appends a middleware; earlier registrations wrap later ones
    pub fn middleware(mut self, middleware: impl Middleware + 'static) -> Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    pub fn build(self) -> Dispatcher {
        let terminal = Arc::new(RouterEndpoint { router: self.router });
        Dispatcher { chain: compose(self.middlewares, terminal) }
    }
}
