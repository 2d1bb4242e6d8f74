//! The bootstrap binary: serves the todo application under a control plane.

use std::sync::Arc;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use rill_lambda::adapter::EventAdapter;
use rill_lambda::client::HttpRuntimeClient;
use rill_lambda::runtime::{InvocationLoop, RuntimeConfig};
use rill_web::app::todo_app;
use rill_web::store::TodoStore;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let config = match RuntimeConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(cause = %e, "not running under a control plane");
            std::process::exit(1);
        }
    };

    let dispatcher = match todo_app(Arc::new(TodoStore::new())) {
        Ok(dispatcher) => dispatcher,
        Err(e) => {
            error!(cause = %e, "route table rejected");
            std::process::exit(1);
        }
    };

    info!(endpoint = %config.endpoint, "starting invocation loop");
    let client = HttpRuntimeClient::new(config.endpoint.clone());
    let invocation_loop = InvocationLoop::new(client, EventAdapter::new(dispatcher), &config);

    if let Err(e) = invocation_loop.run().await {
        error!(cause = %e, "invocation loop stopped");
        std::process::exit(1);
    }
}
