//! The serverless deployment mode of the rill dispatch pipeline.
//!
//! Instead of owning a listening socket, the process long-polls a control
//! plane for invocation events, adapts each event into a canonical request,
//! runs it through a [`rill_web::Dispatcher`] and reports the outcome back —
//! results and failures on two distinct channels.
//!
//! ```no_run
//! use std::sync::Arc;
//! use rill_lambda::adapter::EventAdapter;
//! use rill_lambda::client::HttpRuntimeClient;
//! use rill_lambda::runtime::{InvocationLoop, RuntimeConfig};
//! use rill_web::app::todo_app;
//! use rill_web::store::TodoStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RuntimeConfig::from_env()?;
//!     let dispatcher = todo_app(Arc::new(TodoStore::new()))?;
//!
//!     let client = HttpRuntimeClient::new(config.endpoint.clone());
//!     let adapter = EventAdapter::new(dispatcher);
//!     InvocationLoop::new(client, adapter, &config).run().await?;
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod client;
pub mod context;
pub mod error;
pub mod event;
pub mod runtime;

pub use adapter::EventAdapter;
pub use client::{HttpRuntimeClient, Invocation, RuntimeApi};
pub use context::ExecutionContext;
pub use error::LambdaError;
pub use event::{ErrorEnvelope, InvocationEvent, ResponseEnvelope};
pub use runtime::{InvocationLoop, RuntimeConfig};
