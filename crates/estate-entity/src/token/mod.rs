//! Issued token records held by the ledger.

pub mod kind;
pub mod model;

pub use kind::TokenType;
pub use model::{NewToken, Token};
