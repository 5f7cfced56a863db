//! # estate-entity
//!
//! Domain entity models for the estate backend. Every struct in this crate
//! represents a database table row or a domain value object. Database
//! entities additionally derive `sqlx::FromRow`.

pub mod token;
pub mod user;

pub use token::{NewToken, Token, TokenType};
pub use user::{CreateUser, UpdateUser, User, UserRole};
