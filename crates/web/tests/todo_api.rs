//! End-to-end tests for the illustrative todo service, driving the
//! dispatcher directly with canonical requests.

use bytes::Bytes;
use http::header::{ALLOW, CONTENT_TYPE};
use http::{HeaderValue, Method, StatusCode};
use std::sync::Arc;

use rill_web::app::todo_app;
use rill_web::store::TodoStore;
use rill_web::{Dispatcher, Request, Response};

fn app() -> Dispatcher {
    todo_app(Arc::new(TodoStore::new())).unwrap()
}

async fn send(app: &Dispatcher, request: Request) -> Response {
    app.dispatch(request).await.unwrap()
}

fn json_request(method: Method, path: &str, payload: &serde_json::Value) -> Request {
    Request::new(method, path)
        .with_header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
        .with_body(payload.to_string())
}

fn body_json(response: &Response) -> serde_json::Value {
    serde_json::from_slice(response.body()).unwrap()
}

#[tokio::test]
async fn greeting_and_health() {
    let app = app();

    let response = send(&app, Request::new(Method::GET, "/")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(&response)["message"].as_str().unwrap().contains("Hello"));

    let response = send(&app, Request::new(Method::GET, "/health")).await;
    assert_eq!(body_json(&response), serde_json::json!({ "status": "healthy" }));
}

#[tokio::test]
async fn echo_returns_parsed_body_under_received() {
    let app = app();

    let payload = serde_json::json!({ "hello": "world" });
    let response = send(&app, json_request(Method::POST, "/echo", &payload)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(&response)["received"], payload);
}

#[tokio::test]
async fn echo_with_malformed_body_is_400() {
    let app = app();

    let request = Request::new(Method::POST, "/echo").with_body("{not json");
    let response = send(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn post_then_get_round_trips_a_todo() {
    let app = app();

    let created = send(&app, json_request(Method::POST, "/todos", &serde_json::json!({ "title": "x" }))).await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let created = body_json(&created);
    let id = created["data"]["id"].as_str().unwrap();
    assert_eq!(created["data"]["title"], "x");
    assert_eq!(created["data"]["completed"], false);

    let fetched = send(&app, Request::new(Method::GET, &format!("/todos/{id}"))).await;
    assert_eq!(fetched.status(), StatusCode::OK);
    assert_eq!(body_json(&fetched)["data"], created["data"]);
}

#[tokio::test]
async fn repeated_get_on_unmodified_resource_is_identical() {
    let app = app();

    let created = send(&app, json_request(Method::POST, "/todos", &serde_json::json!({ "title": "x" }))).await;
    let id = body_json(&created)["data"]["id"].as_str().unwrap().to_string();

    let first = send(&app, Request::new(Method::GET, &format!("/todos/{id}"))).await;
    let second = send(&app, Request::new(Method::GET, &format!("/todos/{id}"))).await;

    assert_eq!(first.body(), second.body());

    let list_first = send(&app, Request::new(Method::GET, "/todos")).await;
    let list_second = send(&app, Request::new(Method::GET, "/todos")).await;
    assert_eq!(list_first.body(), list_second.body());
}

#[tokio::test]
async fn create_without_title_is_400() {
    let app = app();

    let response = send(&app, json_request(Method::POST, "/todos", &serde_json::json!({}))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&app, json_request(Method::POST, "/todos", &serde_json::json!({ "title": "  " }))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn full_todo_lifecycle_scenario() {
    let app = app();

    let created = send(&app, json_request(Method::POST, "/todos", &serde_json::json!({ "title": "Buy milk" }))).await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let created = body_json(&created);
    assert_eq!(created["data"]["completed"], false);
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let patched = send(&app, json_request(Method::PATCH, &format!("/todos/{id}"), &serde_json::json!({ "completed": true }))).await;
    assert_eq!(patched.status(), StatusCode::OK);
    assert_eq!(body_json(&patched)["data"]["completed"], true);

    let deleted = send(&app, Request::new(Method::DELETE, &format!("/todos/{id}"))).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
    assert!(deleted.body().is_empty());

    let missing = send(&app, Request::new(Method::GET, &format!("/todos/{id}"))).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(&missing)["error"], "Todo not found");
}

#[tokio::test]
async fn patch_missing_todo_is_404() {
    let app = app();

    let response = send(&app, json_request(Method::PATCH, "/todos/missing", &serde_json::json!({ "completed": true }))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_route_is_404_and_wrong_method_is_405() {
    let app = app();

    let response = send(&app, Request::new(Method::GET, "/nope")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, Request::new(Method::PUT, "/todos")).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let allow = response.headers().get(ALLOW).unwrap().to_str().unwrap();
    assert!(allow.contains("GET"));
    assert!(allow.contains("POST"));
}

#[tokio::test]
async fn upload_without_file_is_400() {
    let app = app();

    let body = "--B\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\ntext\r\n--B--\r\n";
    let request = Request::new(Method::POST, "/upload")
        .with_header(CONTENT_TYPE, HeaderValue::from_static("multipart/form-data; boundary=B"))
        .with_body(body);

    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(&response)["error"], "No file uploaded");
}

#[tokio::test]
async fn upload_echoes_filename_and_content_type() {
    let app = app();

    let body = Bytes::from_static(
        b"--B\r\nContent-Disposition: form-data; name=\"file\"; filename=\"report.pdf\"\r\nContent-Type: application/pdf\r\n\r\n%PDF\r\n--B--\r\n",
    );
    let request = Request::new(Method::POST, "/upload")
        .with_header(CONTENT_TYPE, HeaderValue::from_static("multipart/form-data; boundary=B"))
        .with_body(body);

    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let payload = body_json(&response);
    assert_eq!(payload["filename"], "report.pdf");
    assert_eq!(payload["contentType"], "application/pdf");
}

#[tokio::test]
async fn stores_are_isolated_between_instances() {
    let first = app();
    let second = app();

    send(&first, json_request(Method::POST, "/todos", &serde_json::json!({ "title": "x" }))).await;

    let listed = send(&second, Request::new(Method::GET, "/todos")).await;
    assert_eq!(body_json(&listed)["data"].as_array().unwrap().len(), 0);
}
