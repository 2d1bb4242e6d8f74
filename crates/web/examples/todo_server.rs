use std::sync::Arc;

use rill_web::app::todo_app;
use rill_web::store::TodoStore;
use rill_web::Server;

// Try it:
//   curl -v http://127.0.0.1:8000/health
//   curl -v -H 'Content-Type: application/json' -d '{"title":"Buy milk"}' http://127.0.0.1:8000/todos
//   curl -v http://127.0.0.1:8000/todos
//   curl -v -X PATCH -H 'Content-Type: application/json' -d '{"completed":true}' http://127.0.0.1:8000/todos/<id>
//   curl -v -X DELETE http://127.0.0.1:8000/todos/<id>
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "8000".to_string());
    let store = Arc::new(TodoStore::new());

    let server = Server::builder()
        .dispatcher(todo_app(store)?)
        .address(format!("127.0.0.1:{port}"))
        .build()?;

    server.start().await?;
    Ok(())
}
