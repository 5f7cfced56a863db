//! # estate-auth
//!
//! Authentication and authorization core for the estate backend.
//!
//! ## Modules
//!
//! - `jwt`: signed token creation and verification
//! - `password`: Argon2id hashing and password policy
//! - `issuer`: registration, login, refresh, logout, password reset
//! - `gate`: per-request token extraction, verification, and identity binding
//! - `policy`: path pattern to role requirement table
//! - `accounts`: ban, unban, delete, list, and profile updates

pub mod accounts;
pub mod gate;
pub mod issuer;
pub mod jwt;
pub mod password;
pub mod policy;

pub use accounts::AccountManager;
pub use gate::{GateError, GateOutcome, Identity, RequestGate};
pub use issuer::{IssuedSession, NewAccount, TokenIssuer, normalize_email};
pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordValidator};
pub use policy::{AuthorizationPolicy, Requirement};
