//! Invocation events and reply envelopes.
//!
//! An invocation payload is validated at the boundary: anything that does not
//! match a known event source is rejected with
//! [`LambdaError::InvalidEvent`] before it reaches the dispatcher. Replies
//! travel on two distinct wire channels, [`ResponseEnvelope`] for results and
//! [`ErrorEnvelope`] for failures, so a failed invocation can never be
//! mistaken for a successful one.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::error::LambdaError;

/// One invocation payload, tagged by event source.
#[derive(Debug)]
pub enum InvocationEvent {
    /// An HTTP request forwarded by an API gateway (payload format v2).
    Http(HttpEvent),
}

impl InvocationEvent {
    /// Classifies a raw payload, rejecting unrecognized shapes.
    pub fn from_value(value: Value) -> Result<Self, LambdaError> {
        if !value.is_object() {
            return Err(LambdaError::invalid_event("payload is not a JSON object"));
        }
        if value.get("rawPath").is_none() && value.get("requestContext").is_none() {
            return Err(LambdaError::invalid_event("payload matches no known event source"));
        }

        let event = serde_json::from_value(value)
            .map_err(|e| LambdaError::invalid_event(format!("malformed http event: {e}")))?;
        Ok(Self::Http(event))
    }
}

/// The subset of the API-Gateway v2 HTTP event the adapter consumes.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpEvent {
    #[serde(default)]
    pub raw_path: Option<String>,

    #[serde(default)]
    pub raw_query_string: Option<String>,

    #[serde(default)]
    pub headers: HashMap<String, String>,

    #[serde(default)]
    pub body: Option<String>,

    #[serde(default)]
    pub is_base64_encoded: bool,

    #[serde(default)]
    pub request_context: Option<RequestContext>,
}

impl HttpEvent {
    /// The method string, if the gateway supplied one.
    pub fn method(&self) -> Option<&str> {
        self.request_context.as_ref().and_then(|ctx| ctx.http.as_ref()).and_then(|http| http.method.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RequestContext {
    #[serde(default)]
    pub http: Option<HttpDescription>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HttpDescription {
    #[serde(default)]
    pub method: Option<String>,
}

/// The success reply shape expected by an API gateway.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

/// The failure reply posted to the runtime API's error endpoint.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub error_message: String,
    pub error_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<Vec<String>>,
}

impl ErrorEnvelope {
    pub fn from_error(e: &LambdaError) -> Self {
        Self { error_message: e.to_string(), error_type: e.error_type().to_string(), stack_trace: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_a_v2_http_event() {
        let payload = json!({
            "rawPath": "/todos",
            "rawQueryString": "page=2",
            "headers": { "content-type": "application/json" },
            "body": "{}",
            "isBase64Encoded": false,
            "requestContext": { "http": { "method": "POST" } }
        });

        let InvocationEvent::Http(event) = InvocationEvent::from_value(payload).unwrap();
        assert_eq!(event.raw_path.as_deref(), Some("/todos"));
        assert_eq!(event.raw_query_string.as_deref(), Some("page=2"));
        assert_eq!(event.method(), Some("POST"));
        assert!(!event.is_base64_encoded);
    }

    #[test]
    fn rejects_non_object_payloads() {
        let result = InvocationEvent::from_value(json!([1, 2, 3]));
        assert!(matches!(result, Err(LambdaError::InvalidEvent { .. })));
    }

    #[test]
    fn rejects_unrecognized_shapes() {
        let result = InvocationEvent::from_value(json!({ "Records": [] }));
        assert!(matches!(result, Err(LambdaError::InvalidEvent { .. })));
    }

    #[test]
    fn envelopes_serialize_with_camel_case_names() {
        let envelope = ResponseEnvelope {
            status_code: 200,
            headers: HashMap::new(),
            body: "ok".to_string(),
            is_base64_encoded: false,
        };
        let wire = serde_json::to_value(&envelope).unwrap();
        assert_eq!(wire["statusCode"], 200);
        assert_eq!(wire["isBase64Encoded"], false);

        let envelope = ErrorEnvelope::from_error(&LambdaError::invalid_event("nope"));
        let wire = serde_json::to_value(&envelope).unwrap();
        assert_eq!(wire["errorType"], "InvalidEvent");
        assert!(wire["errorMessage"].as_str().unwrap().contains("nope"));
        assert!(wire.get("stackTrace").is_none());
    }
}
