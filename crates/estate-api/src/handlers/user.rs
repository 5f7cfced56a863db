//! Own-account handlers.

use axum::Json;
use axum::extract::State;

use crate::dto::request::UpdateAccountRequest;
use crate::dto::response::UserResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// GET /api/v1/user/
pub async fn get_account(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.accounts.get(auth.user().id).await?;
    Ok(Json(user.into()))
}

/// POST /api/v1/user/
pub async fn update_account(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateAccountRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .accounts
        .update_profile(auth.user().id, req.first_name, req.last_name, req.mobile_number)
        .await?;
    Ok(Json(user.into()))
}
