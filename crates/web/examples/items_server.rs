use http::StatusCode;
use serde_json::json;

use rill_web::handler_fn;
use rill_web::middleware::{ErrorHandler, Logger};
use rill_web::router::Router;
use rill_web::{Dispatcher, Request, Response, RouterError, Server};

fn param(req: &Request, name: &str) -> String {
    req.param(name).unwrap_or_default().to_string()
}

/// A second dispatcher instance: a stateless categories/items catalog that
/// only echoes what it was asked, useful for poking at nested path params.
fn items_app() -> Result<Dispatcher, RouterError> {
    let router = Router::builder()
        .get("/", handler_fn(|_req: Request| async move {
            Ok(Response::json(StatusCode::OK, &json!({ "success": true, "message": "Hello World" })))
        }))
        .get("/categories/:categoryId/items", handler_fn(|req: Request| async move {
            let category = param(&req, "categoryId");
            Ok(Response::json(
                StatusCode::OK,
                &json!({
                    "success": true,
                    "message": format!("Listing all items in category: {category}"),
                    "category": category,
                }),
            ))
        }))
        .get("/categories/:categoryId/items/:itemId", handler_fn(|req: Request| async move {
            let category = param(&req, "categoryId");
            let item_id = param(&req, "itemId");
            Ok(Response::json(
                StatusCode::OK,
                &json!({
                    "success": true,
                    "message": "Item details",
                    "category": category,
                    "item": {
                        "id": item_id,
                        "name": format!("Sample Item {item_id}"),
                        "category": category,
                    },
                }),
            ))
        }))
        .post("/categories/:categoryId/items", handler_fn(|req: Request| async move {
            let category = param(&req, "categoryId");
            let mut item: serde_json::Map<String, serde_json::Value> = req.json()?;
            item.insert("category".to_string(), json!(category));
            Ok(Response::json(
                StatusCode::CREATED,
                &json!({ "success": true, "message": "Item created", "category": category, "item": item }),
            ))
        }))
        .put("/categories/:categoryId/items/:itemId", handler_fn(|req: Request| async move {
            let category = param(&req, "categoryId");
            let item_id = param(&req, "itemId");
            let mut item: serde_json::Map<String, serde_json::Value> = req.json()?;
            item.insert("id".to_string(), json!(item_id));
            item.insert("category".to_string(), json!(category));
            Ok(Response::json(
                StatusCode::OK,
                &json!({
                    "success": true,
                    "message": format!("Item {item_id} updated"),
                    "category": category,
                    "item": item,
                }),
            ))
        }))
        .delete("/categories/:categoryId/items/:itemId", handler_fn(|req: Request| async move {
            let category = param(&req, "categoryId");
            let item_id = param(&req, "itemId");
            Ok(Response::json(
                StatusCode::OK,
                &json!({
                    "success": true,
                    "message": format!("Item {item_id} deleted"),
                    "category": category,
                }),
            ))
        }))
        .post("/items", handler_fn(|req: Request| async move {
            let item: serde_json::Value = req.json()?;
            Ok(Response::json(
                StatusCode::CREATED,
                &json!({ "success": true, "message": "Item created (legacy endpoint)", "item": item }),
            ))
        }))
        .put("/items/:id", handler_fn(|req: Request| async move {
            let id = param(&req, "id");
            let mut item: serde_json::Map<String, serde_json::Value> = req.json()?;
            item.insert("id".to_string(), json!(id));
            Ok(Response::json(
                StatusCode::OK,
                &json!({ "success": true, "message": format!("Item {id} updated (legacy endpoint)"), "item": item }),
            ))
        }))
        .delete("/items/:id", handler_fn(|req: Request| async move {
            let id = param(&req, "id");
            Ok(Response::json(
                StatusCode::OK,
                &json!({ "success": true, "message": format!("Item {id} deleted (legacy endpoint)") }),
            ))
        }))
        .build()?;

    Ok(Dispatcher::builder(router).middleware(ErrorHandler).middleware(Logger).build())
}

// Try it:
//   curl -v http://127.0.0.1:8000/categories/books/items
//   curl -v -H 'Content-Type: application/json' -d '{"name":"Dune"}' http://127.0.0.1:8000/categories/books/items
//   curl -v -X PUT -H 'Content-Type: application/json' -d '{"name":"Dune"}' http://127.0.0.1:8000/items/42
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "8000".to_string());

    let server = Server::builder()
        .dispatcher(items_app()?)
        .address(format!("127.0.0.1:{port}"))
        .build()?;

    server.start().await?;
    Ok(())
}
