//! `AuthUser` extractor: hands the identity bound by the security middleware
//! to handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use estate_auth::Identity;
use estate_core::error::AuthFailure;
use estate_entity::user::User;

use crate::error::ApiError;

/// The authenticated caller of the current request.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

impl AuthUser {
    /// The caller's account as read by the gate.
    pub fn user(&self) -> &User {
        &self.0.user
    }

    /// The access token the caller presented.
    pub fn token(&self) -> &str {
        &self.0.token
    }
}

impl std::ops::Deref for AuthUser {
    type Target = Identity;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| AuthFailure::MissingToken.into())
    }
}
