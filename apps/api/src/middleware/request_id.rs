//! Per-request correlation id.
//!
//! `propagate_request_id` runs before the trace layer: it adopts the caller's
//! `x-request-id` when that is a UUID, otherwise mints a v4 one, and echoes the
//! id on every response. Handlers that log on their own take `RequestId` as an
//! extractor so their lines can be matched to the request span.

use std::convert::Infallible;

use axum::{
    async_trait,
    body::Body,
    extract::{FromRequestParts, Request},
    http::{request::Parts, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestId(Uuid);

impl RequestId {
    /// The caller-supplied id, if the header holds a well-formed UUID.
    fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let raw = headers.get(REQUEST_ID_HEADER)?.to_str().ok()?;
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }

    fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    fn header_value(self) -> Option<HeaderValue> {
        HeaderValue::from_str(&self.0.to_string()).ok()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// Falls back to a fresh id when the middleware is not installed, as in
/// router-only tests.
#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for RequestId {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let assigned = parts.extensions.get::<RequestId>().copied();
        Ok(assigned.unwrap_or_else(RequestId::generate))
    }
}

pub async fn propagate_request_id(mut request: Request, next: Next) -> Response {
    let request_id = match RequestId::from_headers(request.headers()) {
        Some(id) => id,
        None => RequestId::generate(),
    };
    request.extensions_mut().insert(request_id);

    let mut response = next.run(request).await;
    if let Some(value) = request_id.header_value() {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// Span for `TraceLayer`: method, path and the id assigned above.
pub fn request_span(request: &Request<Body>) -> tracing::Span {
    let request_id = request.extensions().get::<RequestId>().copied();
    match request_id {
        Some(id) => tracing::info_span!(
            "request",
            method = %request.method(),
            path = %request.uri().path(),
            request_id = %id,
        ),
        None => tracing::info_span!(
            "request",
            method = %request.method(),
            path = %request.uri().path(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, middleware, routing::get, Router};
    use tower::ServiceExt;

    use super::*;

    async fn echo(id: RequestId) -> String {
        id.to_string()
    }

    fn echo_router() -> Router {
        Router::new().route("/", get(echo))
    }

    async fn call(router: Router, request_id: Option<&str>) -> (StatusCode, HeaderMap, String) {
        let mut request = axum::http::Request::builder().uri("/");
        if let Some(id) = request_id {
            request = request.header(REQUEST_ID_HEADER, id);
        }
        let response = router
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, headers, String::from_utf8(body.to_vec()).unwrap())
    }

    async fn call_with_middleware(request_id: Option<&str>) -> (StatusCode, String, String) {
        let layer = middleware::from_fn(propagate_request_id);
        let router = echo_router().layer(layer);
        let (status, headers, body) = call(router, request_id).await;
        let header = headers[REQUEST_ID_HEADER].to_str().unwrap().to_string();
        (status, header, body)
    }

    #[tokio::test]
    async fn test_generates_request_id() {
        let (status, header, seen_by_handler) = call_with_middleware(None).await;

        assert_eq!(status, StatusCode::OK);
        assert!(Uuid::parse_str(&header).is_ok());
        assert_eq!(seen_by_handler, header);
    }

    #[tokio::test]
    async fn test_adopts_incoming_uuid() {
        let incoming = "6f1c1a9e-8b1e-4a4b-9d2a-2a8f5d0c7b11";
        let (_, header, seen_by_handler) = call_with_middleware(Some(incoming)).await;

        assert_eq!(header, incoming);
        assert_eq!(seen_by_handler, incoming);
    }

    #[tokio::test]
    async fn test_replaces_malformed_id() {
        let (_, header, _) = call_with_middleware(Some("not-a-uuid")).await;

        assert_ne!(header, "not-a-uuid");
        assert!(Uuid::parse_str(&header).is_ok());
    }

    #[tokio::test]
    async fn test_extractor_without_middleware_generates_id() {
        let (status, headers, body) = call(echo_router(), None).await;

        assert_eq!(status, StatusCode::OK);
        assert!(headers.get(REQUEST_ID_HEADER).is_none());
        assert!(Uuid::parse_str(&body).is_ok());
    }
}
