//! Request correlation.
//!
//! Every editor response carries an `x-request-id` header. IDs supplied by
//! an upstream proxy are kept; requests arriving without one get a fresh
//! UUID. The ID lands on the active tracing span and on the Sentry scope,
//! so a reported save failure can be matched to its log lines and its
//! Sentry event from the header alone.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;

use pagecraft_core::random_uuid;

/// Header carrying the request ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Attach a request ID to the span, the Sentry scope, and the response.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = incoming_id(&request).unwrap_or_else(|| random_uuid().to_string());

    Span::current().record("request_id", &request_id);
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// The ID supplied upstream, if the header holds readable text.
fn incoming_id(request: &Request) -> Option<String> {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(String::from)
}
