//! Application builder: wires router, middleware, and state into an Axum app.

use std::time::Duration;

use axum::Router;
use axum::middleware::from_fn;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use estate_core::config::ServerConfig;

use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::{request_logging, request_span};
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState, server: &ServerConfig) -> Router {
    build_router(state)
        .layer(from_fn(request_logging))
        .layer(TimeoutLayer::new(Duration::from_secs(
            server.request_timeout_seconds,
        )))
        .layer(build_cors_layer(&server.cors))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
}
