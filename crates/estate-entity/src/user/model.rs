//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::UserRole;

/// A registered account: admin, customer, or dealer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Unique login identifier.
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact number.
    pub mobile_number: String,
    /// Authorization role.
    pub role: UserRole,
    /// Authentication fails while this lies in the future.
    pub banned_till: Option<DateTime<Utc>>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if the account is banned at the given instant.
    pub fn is_banned_at(&self, now: DateTime<Utc>) -> bool {
        self.banned_till.is_some_and(|until| until > now)
    }

    /// Check if the account is banned right now.
    pub fn is_banned(&self) -> bool {
        self.is_banned_at(Utc::now())
    }

    /// Check if this user has admin privileges.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Full display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Login email.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact number.
    pub mobile_number: String,
    /// Assigned role.
    pub role: UserRole,
}

/// A partial account update. `None` leaves a field unchanged.
///
/// Owners may only touch the profile fields; `email` and `role` are set by
/// administrators.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    /// The user ID to update.
    pub id: Uuid,
    /// New given name.
    pub first_name: Option<String>,
    /// New family name.
    pub last_name: Option<String>,
    /// New contact number.
    pub mobile_number: Option<String>,
    /// New login email, already normalized.
    pub email: Option<String>,
    /// New role.
    pub role: Option<UserRole>,
}

impl UpdateUser {
    /// Whether the update changes what issued tokens assert about the user.
    pub fn changes_identity(&self, current: &User) -> bool {
        self.email.as_ref().is_some_and(|e| *e != current.email)
            || self.role.is_some_and(|r| r != current.role)
    }
}
