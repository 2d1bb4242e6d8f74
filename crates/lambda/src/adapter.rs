//! Bridges invocation events into the dispatch pipeline.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::Method;
use std::collections::HashMap;
use tracing::{debug, warn};

use rill_web::{Dispatcher, Request, Response};

use crate::context::ExecutionContext;
use crate::error::LambdaError;
use crate::event::{HttpEvent, InvocationEvent, ResponseEnvelope};

/// Translates invocation events into canonical requests, runs them through
/// the dispatcher and shapes the result into a reply envelope.
pub struct EventAdapter {
    dispatcher: Dispatcher,
}

impl EventAdapter {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Adapts one event end to end.
    ///
    /// An `Err` here means the invocation failed and must be reported on the
    /// error channel; route misses and handler-level failures inside the
    /// dispatcher already surface as structured responses and land in the
    /// success envelope with their status code.
    pub async fn adapt(&self, event: InvocationEvent, ctx: &ExecutionContext) -> Result<ResponseEnvelope, LambdaError> {
        let InvocationEvent::Http(event) = event;

        let request = canonical_request(&event)?;
        debug!(request_id = %ctx.aws_request_id, method = %request.method(), path = %request.path(), "adapting invocation");

        let response = self.dispatcher.dispatch(request).await?;
        Ok(envelope(response))
    }
}

fn canonical_request(event: &HttpEvent) -> Result<Request, LambdaError> {
    // A gateway that omits or garbles the method still gets served.
    let method = match event.method() {
        Some(name) => Method::from_bytes(name.as_bytes()).unwrap_or(Method::GET),
        None => Method::GET,
    };
    let path = event.raw_path.as_deref().unwrap_or("/");

    let mut request = Request::new(method, path).with_headers(event_headers(&event.headers));
    if let Some(raw_query) = event.raw_query_string.as_deref().filter(|raw| !raw.is_empty()) {
        request = request.with_query_string(raw_query);
    }
    if let Some(body) = event.body.as_deref() {
        request = request.with_body(event_body(body, event.is_base64_encoded)?);
    }
    Ok(request)
}

fn event_headers(headers: &HashMap<String, String>) -> HeaderMap {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        match (HeaderName::try_from(name.as_str()), HeaderValue::try_from(value.as_str())) {
            (Ok(name), Ok(value)) => {
                map.insert(name, value);
            }
            _ => warn!(header = %name, "skipping unrepresentable event header"),
        }
    }
    map
}

fn event_body(body: &str, is_base64_encoded: bool) -> Result<Bytes, LambdaError> {
    if is_base64_encoded {
        let decoded = BASE64
            .decode(body)
            .map_err(|e| LambdaError::invalid_event(format!("body is not valid base64: {e}")))?;
        Ok(Bytes::from(decoded))
    } else {
        Ok(Bytes::copy_from_slice(body.as_bytes()))
    }
}

fn envelope(response: Response) -> ResponseEnvelope {
    let headers = response
        .headers()
        .iter()
        .map(|(name, value)| (name.as_str().to_string(), String::from_utf8_lossy(value.as_bytes()).into_owned()))
        .collect();

    ResponseEnvelope {
        status_code: response.status().as_u16(),
        headers,
        body: String::from_utf8_lossy(response.body()).into_owned(),
        is_base64_encoded: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    use rill_web::app::todo_app;
    use rill_web::store::TodoStore;

    fn adapter() -> EventAdapter {
        EventAdapter::new(todo_app(Arc::new(TodoStore::new())).unwrap())
    }

    fn ctx() -> ExecutionContext {
        ExecutionContext::from_env("test-request-id")
    }

    fn http_event(value: serde_json::Value) -> InvocationEvent {
        InvocationEvent::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn absent_method_defaults_to_get() {
        let event = http_event(json!({ "rawPath": "/health" }));

        let envelope = adapter().adapt(event, &ctx()).await.unwrap();

        assert_eq!(envelope.status_code, 200);
        assert!(envelope.body.contains("healthy"));
        assert!(!envelope.is_base64_encoded);
    }

    #[tokio::test]
    async fn malformed_method_defaults_to_get() {
        let event = http_event(json!({
            "rawPath": "/health",
            "requestContext": { "http": { "method": "NOT A METHOD" } }
        }));

        let envelope = adapter().adapt(event, &ctx()).await.unwrap();
        assert_eq!(envelope.status_code, 200);
    }

    #[tokio::test]
    async fn absent_path_defaults_to_root() {
        let event = http_event(json!({ "requestContext": { "http": { "method": "GET" } } }));

        let envelope = adapter().adapt(event, &ctx()).await.unwrap();
        assert_eq!(envelope.status_code, 200);
        assert!(envelope.body.contains("Hello"));
    }

    #[tokio::test]
    async fn base64_body_is_decoded_before_dispatch() {
        let payload = json!({ "hello": "world" }).to_string();
        let event = http_event(json!({
            "rawPath": "/echo",
            "body": BASE64.encode(&payload),
            "isBase64Encoded": true,
            "requestContext": { "http": { "method": "POST" } }
        }));

        let envelope = adapter().adapt(event, &ctx()).await.unwrap();

        assert_eq!(envelope.status_code, 200);
        let reply: serde_json::Value = serde_json::from_str(&envelope.body).unwrap();
        assert_eq!(reply["received"]["hello"], "world");
    }

    #[tokio::test]
    async fn invalid_base64_body_is_an_invalid_event() {
        let event = http_event(json!({
            "rawPath": "/echo",
            "body": "not base64 !!!",
            "isBase64Encoded": true,
            "requestContext": { "http": { "method": "POST" } }
        }));

        let result = adapter().adapt(event, &ctx()).await;
        assert!(matches!(result, Err(LambdaError::InvalidEvent { .. })));
    }

    #[tokio::test]
    async fn query_string_reaches_the_handler() {
        let event = http_event(json!({
            "rawPath": "/todos",
            "rawQueryString": "page=2&limit=10",
            "requestContext": { "http": { "method": "GET" } }
        }));

        let envelope = adapter().adapt(event, &ctx()).await.unwrap();
        assert_eq!(envelope.status_code, 200);
    }

    #[tokio::test]
    async fn unknown_route_lands_in_the_success_envelope_as_404() {
        let event = http_event(json!({
            "rawPath": "/nope",
            "requestContext": { "http": { "method": "GET" } }
        }));

        let envelope = adapter().adapt(event, &ctx()).await.unwrap();
        assert_eq!(envelope.status_code, 404);
    }

    #[tokio::test]
    async fn handler_failure_without_error_middleware_escapes_as_handler_error() {
        use rill_web::router::Router;
        use rill_web::{WebError, handler_fn};

        let router = Router::builder()
            .get("/boom", handler_fn(|_req: Request| async move {
                Err::<rill_web::Response, _>(WebError::handler("kaboom"))
            }))
            .build()
            .unwrap();
        let adapter = EventAdapter::new(Dispatcher::builder(router).build());

        let event = http_event(json!({ "rawPath": "/boom" }));
        let result = adapter.adapt(event, &ctx()).await;

        let error = result.unwrap_err();
        assert!(matches!(error, LambdaError::Handler { .. }));

        let envelope = crate::event::ErrorEnvelope::from_error(&error);
        assert!(!envelope.error_message.is_empty());
        assert_eq!(envelope.error_type, "Handler");
    }

    #[tokio::test]
    async fn unrepresentable_headers_are_skipped() {
        let event = http_event(json!({
            "rawPath": "/health",
            "headers": { "bad header name": "x", "x-ok": "1" }
        }));

        let envelope = adapter().adapt(event, &ctx()).await.unwrap();
        assert_eq!(envelope.status_code, 200);
    }
}
