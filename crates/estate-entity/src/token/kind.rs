//! Token type enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which half of a pair a token is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "token_type", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenType {
    /// Short-lived token presented on every request.
    Access,
    /// Long-lived token exchanged for a fresh pair.
    Refresh,
}

impl TokenType {
    /// Return the type as an uppercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Access => "ACCESS",
            Self::Refresh => "REFRESH",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
