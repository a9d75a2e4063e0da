//! Servlet-style request handlers mountable on a path prefix.
//!
//! A [`Servlet`] only writes status, headers and body into a
//! [`ServletResponse`]. Finalising the response is the job of [`dispatch`],
//! which always runs after `service` returns, whatever `service` did.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::Request;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use axum::response::Response;
use axum::routing::{MethodRouter, any};
use bytes::Bytes;

/// A request handler with a single overridable operation.
///
/// Implementations must not rely on mutable state shared between calls:
/// one instance serves concurrent requests.
pub trait Servlet: Send + Sync + 'static {
    /// Handles one request by writing into `response`.
    fn service(&self, request: &Request, response: &mut ServletResponse);
}

/// Mutable response sink handed to [`Servlet::service`].
#[derive(Debug, Clone)]
pub struct ServletResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl Default for ServletResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl ServletResponse {
    /// Creates an empty `200 OK` response.
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Returns the current status code.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Sets the status code.
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Returns the headers written so far.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Sets a header, replacing any previous value.
    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    /// Returns the body written so far.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Replaces the body.
    pub fn send(&mut self, body: impl Into<Bytes>) {
        self.body = body.into();
    }

    /// Finalises the response. Nothing can be written afterwards.
    #[must_use]
    pub fn end(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

/// Returns true for the methods a read-only servlet answers.
#[must_use]
pub fn is_get_or_head(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD
}

/// Runs `servlet` for one request, then finalises its response.
pub fn dispatch<S: Servlet + ?Sized>(servlet: &S, request: &Request) -> Response {
    let mut response = ServletResponse::new();
    servlet.service(request, &mut response);
    response.end()
}

/// Wraps a servlet into a handler accepting every method.
///
/// The result is meant for `Router::nest_service`, which mounts it on a
/// path prefix.
pub fn mount<S: Servlet + ?Sized>(servlet: Arc<S>) -> MethodRouter {
    any(move |request: Request| {
        let servlet = Arc::clone(&servlet);
        async move { dispatch(servlet.as_ref(), &request) }
    })
}
