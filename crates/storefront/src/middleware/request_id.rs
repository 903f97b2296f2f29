//! Request ID middleware.
//!
//! Each request gets an ID in the `x-request-id` header of the response, in
//! the `request_id` field of its tracing span, and as a Sentry tag. An ID sent
//! by an upstream proxy is reused when it looks sane; otherwise a UUID v4 is
//! generated.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream ID we will echo back.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Attach a request ID to the span, the Sentry scope and the response.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(accept_upstream_id)
        .map_or_else(|| Uuid::new_v4().to_string(), str::to_owned);

    Span::current().record("request_id", request_id.as_str());
    sentry::configure_scope(|scope| scope.set_tag("request_id", &request_id));

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Keep an upstream ID only if it is short and made of token characters.
fn accept_upstream_id(id: &str) -> Option<&str> {
    let id = id.trim();
    let valid = !id.is_empty()
        && id.len() <= MAX_REQUEST_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b':'));
    valid.then_some(id)
}
