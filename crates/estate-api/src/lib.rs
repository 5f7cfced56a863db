//! # estate-api
//!
//! HTTP API layer for the estate backend built on Axum.
//!
//! Provides the auth, account, and admin endpoints, the security middleware
//! that runs the request gate and the authorization policy in front of every
//! route, extractors, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::ApiError;
pub use state::AppState;
