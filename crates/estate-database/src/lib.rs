//! # estate-database
//!
//! Persistence boundary for the authentication core. The [`IdentityStore`]
//! and [`TokenLedger`] traits are implemented twice: by PostgreSQL
//! repositories on top of sqlx and by process-local in-memory stores used
//! for the `memory` provider and in tests.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::{MemoryIdentityStore, MemoryTokenLedger};
pub use repositories::{TokenRepository, UserRepository};
pub use store::{IdentityStore, TokenLedger};
