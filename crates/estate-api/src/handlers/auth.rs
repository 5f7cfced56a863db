//! Auth handlers: register, authenticate, refresh, logout, password reset,
//! and token inspection.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;

use estate_auth::NewAccount;
use estate_entity::token::TokenType;

use crate::dto::request::{
    AccessTokenQuery, AuthenticationRequest, PasswordResetRequest, RefreshRequest,
    RefreshTokenQuery, RegisterRequest,
};
use crate::dto::response::{AuthenticationResponse, MessageResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthenticationResponse>), ApiError> {
    let session = state
        .issuer
        .register(NewAccount {
            first_name: req.first_name,
            last_name: req.last_name,
            mobile_number: req.mobile_number,
            email: req.email,
            password: req.password,
            role: req.role,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(session.into())))
}

/// POST /api/v1/auth/authenticate
pub async fn authenticate(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<AuthenticationRequest>,
) -> Result<(StatusCode, Json<AuthenticationResponse>), ApiError> {
    let session = state.issuer.authenticate(&req.email, &req.password).await?;
    Ok((StatusCode::ACCEPTED, Json(session.into())))
}

/// POST /api/v1/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RefreshRequest>,
) -> Result<Json<AuthenticationResponse>, ApiError> {
    let session = state.issuer.refresh(&req.refresh_token).await?;
    Ok(Json(session.into()))
}

/// GET /api/v1/auth/user
pub async fn current_user(auth: AuthUser) -> Json<UserResponse> {
    Json(auth.0.user.into())
}

/// POST /api/v1/auth/resetPassword
pub async fn reset_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<PasswordResetRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    state
        .issuer
        .reset_password(auth.token(), &req.new_password)
        .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse::new("Password changed; sign in again")),
    ))
}

/// POST /api/v1/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MessageResponse>, ApiError> {
    state.issuer.logout(auth.token()).await?;
    Ok(Json(MessageResponse::new("Logged out successfully")))
}

/// GET /api/v1/auth/userByAccessToken
pub async fn user_by_access_token(
    State(state): State<AppState>,
    Query(query): Query<AccessTokenQuery>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .issuer
        .user_by_token(&query.access_token, TokenType::Access)
        .await?;
    Ok(Json(user.into()))
}

/// GET /api/v1/auth/userByRefreshToken
pub async fn user_by_refresh_token(
    State(state): State<AppState>,
    Query(query): Query<RefreshTokenQuery>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .issuer
        .user_by_token(&query.refresh_token, TokenType::Refresh)
        .await?;
    Ok(Json(user.into()))
}
