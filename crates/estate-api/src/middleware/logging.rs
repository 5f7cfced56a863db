//! Request/response logging middleware.
//!
//! Only the path is ever recorded. Query strings can carry token values
//! (`userByAccessToken?accessToken=...`) and stay out of spans and events.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{Span, info, info_span};

/// Span for `TraceLayer`: method and path, no query string or headers.
pub fn request_span(request: &Request) -> Span {
    info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
    )
}

/// Logs request method, path, status, and duration.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    info!(
        method = %method,
        path = %uri.path(),
        status = status.as_u16(),
        duration_ms = duration.as_millis() as u64,
        "HTTP request"
    );

    response
}
