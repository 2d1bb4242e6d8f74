//! The route table.
//!
//! Routes bind an HTTP method and a path pattern to a handler. A pattern is
//! an ordered sequence of segments, each either a literal or a `:named`
//! parameter placeholder; a placeholder matches any non-empty segment and
//! binds its value.
//!
//! Lookup semantics:
//!
//! - no pattern matches the path under any method → [`RouteMatch::NotFound`]
//! - a pattern matches the path only under other methods →
//!   [`RouteMatch::MethodNotAllowed`] carrying the exact allowed set
//! - several patterns match under the requested method → the one with the
//!   fewest parameter placeholders wins (most literal first)
//!
//! Exact duplicates are rejected when the table is built: two routes with the
//! same method and literal-equivalent patterns (equal literals positionwise,
//! placeholders at the same positions) would be ambiguous.

use http::Method;

use crate::error::RouterError;
use crate::handler::RequestHandler;
use crate::request::PathParams;

/// One segment of a path pattern
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        match raw.strip_prefix(':') {
            Some(name) => Self::Param(name.to_string()),
            None => Self::Literal(raw.to_string()),
        }
    }
}

/// A parsed path pattern
#[derive(Debug, Clone)]
pub struct Pattern {
    raw: String,
    segments: Vec<Segment>,
}

impl Pattern {
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let segments = split_segments(&raw).into_iter().map(Segment::parse).collect();
        Self { raw, segments }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    fn param_count(&self) -> usize {
        self.segments.iter().filter(|s| matches!(s, Segment::Param(_))).count()
    }

    /// Matches pre-split path segments, binding parameter values.
    ///
    /// Segment counts must agree exactly; there is no trailing wildcard.
    fn matches(&self, path_segments: &[&str]) -> Option<PathParams> {
        if self.segments.len() != path_segments.len() {
            return None;
        }

        let mut params = PathParams::empty();
        for (segment, path_segment) in self.segments.iter().zip(path_segments) {
            match segment {
                Segment::Literal(literal) => {
                    if literal != path_segment {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    if path_segment.is_empty() {
                        return None;
                    }
                    params.insert(name.clone(), (*path_segment).to_string());
                }
            }
        }

        Some(params)
    }

    /// Two patterns are literal-equivalent when they accept the same literal
    /// paths, regardless of parameter names.
    fn is_literal_equivalent(&self, other: &Self) -> bool {
        self.segments.len() == other.segments.len()
            && self.segments.iter().zip(&other.segments).all(|pair| match pair {
                (Segment::Literal(a), Segment::Literal(b)) => a == b,
                (Segment::Param(_), Segment::Param(_)) => true,
                _ => false,
            })
    }
}

fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}

struct Route {
    method: Method,
    pattern: Pattern,
    handler: Box<dyn RequestHandler>,
}

/// Result of matching a `(method, path)` pair against the table
pub enum RouteMatch<'router> {
    Found { handler: &'router dyn RequestHandler, params: PathParams },
    MethodNotAllowed { allowed: Vec<Method> },
    NotFound,
}

/// An immutable route table, fixed at startup
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Creates a new router builder
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// Matches a `(method, path)` pair against the table
    pub fn at(&self, method: &Method, path: &str) -> RouteMatch<'_> {
        let path_segments = split_segments(path);

        let mut best: Option<(&Route, PathParams)> = None;
        let mut allowed: Vec<Method> = Vec::new();

        for route in &self.routes {
            let Some(params) = route.pattern.matches(&path_segments) else {
                continue;
            };

            if &route.method == method {
                let more_literal = match &best {
                    Some((current, _)) => route.pattern.param_count() < current.pattern.param_count(),
                    None => true,
                };
                if more_literal {
                    best = Some((route, params));
                }
            } else if !allowed.contains(&route.method) {
                allowed.push(route.method.clone());
            }
        }

        match best {
            Some((route, params)) => RouteMatch::Found { handler: route.handler.as_ref(), params },
            None if !allowed.is_empty() => RouteMatch::MethodNotAllowed { allowed },
            None => RouteMatch::NotFound,
        }
    }
}

/// Accumulates routes and validates them when the table is built
pub struct RouterBuilder {
    routes: Vec<Route>,
}

impl RouterBuilder {
    fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Registers a route for the given method and pattern string
    pub fn route(mut self, method: Method, pattern: impl Into<String>, handler: impl RequestHandler + 'static) -> Self {
        self.routes.push(Route { method, pattern: Pattern::parse(pattern), handler: Box::new(handler) });
        self
    }

    pub fn get(self, pattern: impl Into<String>, handler: impl RequestHandler + 'static) -> Self {
        self.route(Method::GET, pattern, handler)
    }

    pub fn post(self, pattern: impl Into<String>, handler: impl RequestHandler + 'static) -> Self {
        self.route(Method::POST, pattern, handler)
    }

    pub fn put(self, pattern: impl Into<String>, handler: impl RequestHandler + 'static) -> Self {
        self.route(Method::PUT, pattern, handler)
    }

    pub fn patch(self, pattern: impl Into<String>, handler: impl RequestHandler + 'static) -> Self {
        self.route(Method::PATCH, pattern, handler)
    }

    pub fn delete(self, pattern: impl Into<String>, handler: impl RequestHandler + 'static) -> Self {
        self.route(Method::DELETE, pattern, handler)
    }

    /// Builds the route table, rejecting ambiguous registrations
    pub fn build(self) -> Result<Router, RouterError> {
        for (index, route) in self.routes.iter().enumerate() {
            let duplicate = self.routes[..index]
                .iter()
                .any(|earlier| earlier.method == route.method && earlier.pattern.is_literal_equivalent(&route.pattern));
            if duplicate {
                return Err(RouterError::DuplicateRoute {
                    method: route.method.clone(),
                    pattern: route.pattern.raw().to_string(),
                });
            }
        }

        Ok(Router { routes: self.routes })
    }
}
