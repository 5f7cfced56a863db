//! # estate-core
//!
//! Core crate for the real-estate backend. Contains configuration schemas,
//! the unified error system, and the authentication failure taxonomy shared
//! by the stores, the token issuer, and the HTTP layer.
//!
//! This crate has **no** internal dependencies on other estate crates.

pub mod config;
pub mod error;
pub mod result;

pub use error::{AppError, AuthFailure, ErrorKind};
pub use result::AppResult;
