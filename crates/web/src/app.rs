//! The illustrative todo application.
//!
//! Wires the todo route table around an injected [`TodoStore`] and composes
//! the standard middleware stack: error handling outermost, then request
//! logging, then CORS.
//!
//! | Method | Path        | Behavior                                     |
//! |--------|-------------|----------------------------------------------|
//! | GET    | /           | greeting payload                             |
//! | GET    | /health     | `{"status":"healthy"}`                       |
//! | POST   | /echo       | echoes the parsed body under `received`      |
//! | GET    | /todos      | all stored todos                             |
//! | GET    | /todos/:id  | one todo or 404                              |
//! | POST   | /todos      | creates a todo, 201                          |
//! | PATCH  | /todos/:id  | merges partial fields or 404                 |
//! | DELETE | /todos/:id  | removes a todo, 204, or 404                  |
//! | POST   | /upload     | multipart; 400 without a file part           |

use http::StatusCode;
use http::header::CONTENT_TYPE;
use serde_json::json;
use std::sync::Arc;

use crate::dispatcher::Dispatcher;
use crate::error::{RouterError, WebError};
use crate::handler::handler_fn;
use crate::middleware::{Cors, ErrorHandler, Logger};
use crate::multipart;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;
use crate::store::{CreateTodo, TodoStore, UpdateTodo};

fn todo_not_found() -> Response {
    Response::json(StatusCode::NOT_FOUND, &json!({ "error": "Todo not found" }))
}

/// Builds the todo-service dispatcher around the given store.
pub fn todo_app(store: Arc<TodoStore>) -> Result<Dispatcher, RouterError> {
    let list_store = store.clone();
    let get_store = store.clone();
    let create_store = store.clone();
    let update_store = store.clone();
    let delete_store = store;

    let router = Router::builder()
        .get("/", handler_fn(|_req: Request| async move {
            Ok(Response::json(StatusCode::OK, &json!({ "message": "Hello from rill!" })))
        }))
        .get("/health", handler_fn(|_req: Request| async move {
            Ok(Response::json(StatusCode::OK, &json!({ "status": "healthy" })))
        }))
        .post("/echo", handler_fn(|req: Request| async move {
            let received: serde_json::Value = req.json()?;
            Ok(Response::json(StatusCode::OK, &json!({ "message": "Echo endpoint", "received": received })))
        }))
        .get("/todos", handler_fn(move |_req: Request| {
            let store = list_store.clone();
            async move { Ok(Response::json(StatusCode::OK, &json!({ "data": store.list() }))) }
        }))
        .get("/todos/:id", handler_fn(move |req: Request| {
            let store = get_store.clone();
            async move {
                match req.param("id").and_then(|id| store.get(id)) {
                    Some(todo) => Ok(Response::json(StatusCode::OK, &json!({ "data": todo }))),
                    None => Ok(todo_not_found()),
                }
            }
        }))
        .post("/todos", handler_fn(move |req: Request| {
            let store = create_store.clone();
            async move {
                let payload: CreateTodo = req.json()?;
                if payload.title.trim().is_empty() {
                    return Err(WebError::validation("title is required"));
                }
                let todo = store.create(payload.title);
                Ok(Response::json(StatusCode::CREATED, &json!({ "data": todo })))
            }
        }))
        .patch("/todos/:id", handler_fn(move |req: Request| {
            let store = update_store.clone();
            async move {
                let patch: UpdateTodo = req.json()?;
                match req.param("id").and_then(|id| store.update(id, patch)) {
                    Some(todo) => Ok(Response::json(StatusCode::OK, &json!({ "data": todo }))),
                    None => Ok(todo_not_found()),
                }
            }
        }))
        .delete("/todos/:id", handler_fn(move |req: Request| {
            let store = delete_store.clone();
            async move {
                match req.param("id").map(|id| store.remove(id)) {
                    Some(true) => Ok(Response::empty(StatusCode::NO_CONTENT)),
                    _ => Ok(todo_not_found()),
                }
            }
        }))
        .post("/upload", handler_fn(|req: Request| async move {
            let content_type = req.headers().get(CONTENT_TYPE).and_then(|value| value.to_str().ok());
            let body = req.body().map(AsRef::as_ref).unwrap_or_default();
            match multipart::first_file(content_type, body)? {
                Some(file) => Ok(Response::json(
                    StatusCode::OK,
                    &json!({ "message": "File received", "filename": file.filename, "contentType": file.content_type }),
                )),
                None => Ok(Response::json(StatusCode::BAD_REQUEST, &json!({ "error": "No file uploaded" }))),
            }
        }))
        .build()?;

    Ok(Dispatcher::builder(router).middleware(ErrorHandler).middleware(Logger).middleware(Cors::default()).build())
}
