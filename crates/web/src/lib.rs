//! The rill request dispatch pipeline.
//!
//! This crate contains the pieces a deployment mode composes into a service:
//!
//! - [`Request`] / [`Response`]: the canonical request/response model, shared
//!   by the standalone server and the serverless adapter
//! - [`router`]: the route table, matching `(method, path)` pairs against
//!   literal and `:named` parameter patterns
//! - [`middleware`]: the ordered interceptor chain, folded into a single
//!   composed endpoint at startup
//! - [`Dispatcher`]: resolves a request to a response through the chain and
//!   the route table
//! - [`store`] / [`app`]: the illustrative in-memory todo service
//! - [`Server`]: a standalone deployment running the dispatcher on a
//!   `rill-http` TCP listener
//!
//! # Example
//!
//! ```
//! use http::StatusCode;
//! use rill_web::router::Router;
//! use rill_web::{handler_fn, Dispatcher, Request, Response};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let router = Router::builder()
//!     .get("/hello/:name", handler_fn(|req: Request| async move {
//!         let name = req.param("name").unwrap_or("world").to_string();
//!         Ok(Response::json(StatusCode::OK, &serde_json::json!({ "hello": name })))
//!     }))
//!     .build()
//!     .unwrap();
//!
//! let dispatcher = Dispatcher::builder(router).build();
//!
//! let response = dispatcher
//!     .dispatch(Request::new(http::Method::GET, "/hello/rill"))
//!     .await
//!     .unwrap();
//! assert_eq!(response.status(), StatusCode::OK);
//! # }
//! ```

mod dispatcher;
mod error;
mod handler;
mod request;
mod response;
mod server;

pub mod app;
pub mod middleware;
pub mod multipart;
pub mod router;
pub mod store;

pub use dispatcher::Dispatcher;
pub use dispatcher::DispatcherBuilder;
pub use error::RouterError;
pub use error::WebError;
pub use handler::FnHandler;
pub use handler::RequestHandler;
pub use handler::handler_fn;
pub use request::PathParams;
pub use request::Request;
pub use response::Response;
pub use server::Server;
pub use server::ServerBuildError;
