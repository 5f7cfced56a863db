//! Admin user management handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use estate_core::error::AppError;
use estate_entity::user::UpdateUser;

use crate::dto::request::{AdminUpdateAccountRequest, BanRequest, UserListQuery};
use crate::dto::response::{MessageResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson, parse_uuid};
use crate::state::AppState;

/// GET /api/v1/admin/user-management
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.accounts.list(query.role).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /api/v1/admin/user-management/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.accounts.get(parse_uuid(&id)?).await?;
    Ok(Json(user.into()))
}

/// POST /api/v1/admin/user-management/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<AdminUpdateAccountRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .accounts
        .update_account(UpdateUser {
            id: parse_uuid(&id)?,
            first_name: req.first_name,
            last_name: req.last_name,
            mobile_number: req.mobile_number,
            email: req.email,
            role: req.role,
        })
        .await?;
    Ok(Json(user.into()))
}

/// POST /api/v1/admin/user-management/{id}/ban
pub async fn ban_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<BanRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user_id = parse_uuid(&id)?;
    if user_id == auth.user().id {
        return Err(AppError::validation("Administrators cannot ban themselves").into());
    }

    let user = state.accounts.ban(user_id, req.banned_till).await?;
    Ok(Json(user.into()))
}

/// POST /api/v1/admin/user-management/{id}/unban
pub async fn unban_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.accounts.unban(parse_uuid(&id)?).await?;
    Ok(Json(user.into()))
}

/// DELETE /api/v1/admin/user-management/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user_id = parse_uuid(&id)?;
    if user_id == auth.user().id {
        return Err(AppError::validation("Administrators cannot delete themselves").into());
    }

    state.accounts.delete(user_id).await?;
    Ok(Json(MessageResponse::new("User deleted")))
}
