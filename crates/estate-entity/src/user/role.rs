//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles available in the authorization system.
///
/// `Admin` satisfies every role check; `Customer` and `Dealer` are
/// incomparable with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    /// Manages accounts.
    Admin,
    /// Browses, bookmarks, and applies for properties.
    Customer,
    /// Lists properties and reviews applications.
    Dealer,
}

impl UserRole {
    /// Every role, in declaration order.
    pub const ALL: [UserRole; 3] = [Self::Admin, Self::Customer, Self::Dealer];

    /// Check whether this role passes a check that requires `required`.
    pub fn satisfies(&self, required: &UserRole) -> bool {
        self.is_admin() || self == required
    }

    /// Check whether this role passes a check that accepts any of `allowed`.
    pub fn satisfies_any(&self, allowed: &[UserRole]) -> bool {
        allowed.iter().any(|r| self.satisfies(r))
    }

    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Return the role as an uppercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Customer => "CUSTOMER",
            Self::Dealer => "DEALER",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = estate_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ADMIN" => Ok(Self::Admin),
            "CUSTOMER" => Ok(Self::Customer),
            "DEALER" => Ok(Self::Dealer),
            _ => Err(estate_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: ADMIN, CUSTOMER, DEALER"
            ))),
        }
    }
}
