//! The canonical request model used by every deployment mode.
//!
//! A [`Request`] is fully owned: the standalone server builds one from a
//! decoded `http::Request<Bytes>`, the serverless adapter builds one from an
//! invocation event. Path parameters are populated by the route table during
//! matching.

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::debug;

use crate::error::WebError;

/// Represents path parameters extracted from the URL path of a request.
///
/// Path parameters are named segments in a route pattern that bind the
/// corresponding path segment. For the pattern `/todos/:id` and the path
/// `/todos/abc`, the parameter `id` holds `"abc"`. Keys are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    inner: HashMap<String, String>,
}

impl PathParams {
    /// Creates an empty PathParams instance with no parameters
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true if there are no path parameters
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of path parameters
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Gets the value of a path parameter by its name
    #[inline]
    pub fn get(&self, key: impl AsRef<str>) -> Option<&str> {
        self.inner.get(key.as_ref()).map(String::as_str)
    }

    pub(crate) fn insert(&mut self, key: String, value: String) {
        self.inner.insert(key, value);
    }
}

/// A canonical HTTP request.
#[derive(Debug)]
pub struct Request {
    method: Method,
    path: String,
    raw_query: Option<String>,
    query: HashMap<String, String>,
    path_params: PathParams,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            raw_query: None,
            query: HashMap::new(),
            path_params: PathParams::empty(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Attaches a raw query string, parsing it into the query map.
    ///
    /// The raw string is preserved as received; pairs that cannot be decoded
    /// leave the parsed map empty rather than failing the request.
    pub fn with_query_string(mut self, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        match serde_urlencoded::from_str::<Vec<(String, String)>>(&raw) {
            Ok(pairs) => self.query = pairs.into_iter().collect(),
            Err(e) => debug!(cause = %e, query = %raw, "ignoring undecodable query string"),
        }
        self.raw_query = Some(raw);
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Returns the HTTP method of the request
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request path, without the query string
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the raw query string as received, if any
    pub fn raw_query(&self) -> Option<&str> {
        self.raw_query.as_deref()
    }

    /// Gets a decoded query parameter by name
    pub fn query(&self, name: impl AsRef<str>) -> Option<&str> {
        self.query.get(name.as_ref()).map(String::as_str)
    }

    /// Returns the HTTP headers of the request
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a reference to the path parameters bound during matching
    pub fn path_params(&self) -> &PathParams {
        &self.path_params
    }

    /// Gets a bound path parameter by name
    pub fn param(&self, name: impl AsRef<str>) -> Option<&str> {
        self.path_params.get(name)
    }

    /// Returns the request body, if any
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Returns the body as text, replacing invalid UTF-8 sequences
    pub fn text(&self) -> Option<Cow<'_, str>> {
        self.body.as_ref().map(|body| String::from_utf8_lossy(body))
    }

    /// Deserializes the request body as JSON.
    ///
    /// An absent or malformed body is a [`WebError::Validation`], mapped to a
    /// 400 response by the error taxonomy.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, WebError> {
        let body = self.body.as_ref().ok_or_else(|| WebError::validation("request body is required"))?;
        serde_json::from_slice(body).map_err(|e| WebError::validation(format!("malformed json body: {e}")))
    }

    pub(crate) fn set_path_params(&mut self, params: PathParams) {
        self.path_params = params;
    }
}
