//! PostgreSQL implementations of the identity store and the token ledger.

pub mod token;
pub mod user;

pub use token::TokenRepository;
pub use user::UserRepository;
