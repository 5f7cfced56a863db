//! Security middleware: runs the request gate and the authorization policy
//! in front of every route.
//!
//! On success the caller's [`Identity`] is stored in the request extensions
//! for the [`AuthUser`](crate::extractors::AuthUser) extractor. A denial ends
//! the request with 403 before any handler runs.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use estate_auth::{GateOutcome, Identity};

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticate the bearer token, then authorize the path.
pub async fn security_guard(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authorization = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let path = request.uri().path().to_owned();

    let outcome = state.gate.inspect(authorization.as_deref()).await?;

    if let Err(failure) = state.policy.authorize(&path, &outcome) {
        debug!(
            method = %request.method(),
            path = %path,
            requirement = %state.policy.requirement_for(&path),
            reason = ?failure,
            "Request denied"
        );
        return Err(failure.into());
    }

    if let GateOutcome::Authenticated(identity) = outcome {
        request.extensions_mut().insert::<Identity>(identity);
    }

    Ok(next.run(request).await)
}
