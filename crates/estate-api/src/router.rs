//! Route definitions for the estate HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`. The
//! security middleware wraps every route, including the 404 fallback, so
//! an unknown path is still subject to the default authorization rule.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the Axum router with all routes and the security middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(admin_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::security::security_guard,
        ))
        .with_state(state)
}

/// Token lifecycle endpoints
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/v1/auth/register", post(handlers::auth::register))
        .route("/v1/auth/authenticate", post(handlers::auth::authenticate))
        .route("/v1/auth/refresh", post(handlers::auth::refresh))
        .route("/v1/auth/user", get(handlers::auth::current_user))
        .route("/v1/auth/resetPassword", post(handlers::auth::reset_password))
        .route("/v1/auth/logout", post(handlers::auth::logout))
        .route(
            "/v1/auth/userByAccessToken",
            get(handlers::auth::user_by_access_token),
        )
        .route(
            "/v1/auth/userByRefreshToken",
            get(handlers::auth::user_by_refresh_token),
        )
}

/// Own-account endpoints
fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/user",
            get(handlers::user::get_account).post(handlers::user::update_account),
        )
        .route(
            "/v1/user/",
            get(handlers::user::get_account).post(handlers::user::update_account),
        )
}

/// Account administration
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/admin/user-management",
            get(handlers::admin::users::list_users),
        )
        .route(
            "/v1/admin/user-management/{id}",
            get(handlers::admin::users::get_user)
                .post(handlers::admin::users::update_user)
                .delete(handlers::admin::users::delete_user),
        )
        .route(
            "/v1/admin/user-management/{id}/ban",
            post(handlers::admin::users::ban_user),
        )
        .route(
            "/v1/admin/user-management/{id}/unban",
            post(handlers::admin::users::unban_user),
        )
}

/// Liveness
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
