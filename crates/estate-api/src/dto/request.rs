//! Request DTOs with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use estate_entity::user::UserRole;

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Given name.
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,
    /// Family name.
    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,
    /// Contact number.
    #[validate(length(min = 1, max = 32, message = "Mobile number is required"))]
    pub mobile_number: String,
    /// Login email.
    #[validate(email(message = "Email is not valid"))]
    pub email: String,
    /// Plaintext password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// Requested role.
    pub role: UserRole,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AuthenticationRequest {
    /// Login email.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// Refresh token.
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Password reset request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetRequest {
    /// Replacement password.
    #[validate(length(min = 1, message = "New password is required"))]
    pub new_password: String,
}

/// Own-account update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    /// Given name.
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    /// Family name.
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    /// Contact number.
    #[validate(length(min = 1, max = 32))]
    pub mobile_number: Option<String>,
}

/// Administrative account update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdateAccountRequest {
    /// Given name.
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    /// Family name.
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    /// Contact number.
    #[validate(length(min = 1, max = 32))]
    pub mobile_number: Option<String>,
    /// New login email.
    #[validate(email(message = "Email is not valid"))]
    pub email: Option<String>,
    /// New role.
    pub role: Option<UserRole>,
}

/// Admin ban request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BanRequest {
    /// End of the ban.
    pub banned_till: DateTime<Utc>,
}

/// `?accessToken=` query.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenQuery {
    /// The access token to resolve.
    pub access_token: String,
}

/// `?refreshToken=` query.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenQuery {
    /// The refresh token to resolve.
    pub refresh_token: String,
}

/// Admin user listing filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListQuery {
    /// Only accounts holding this role.
    pub role: Option<UserRole>,
}
