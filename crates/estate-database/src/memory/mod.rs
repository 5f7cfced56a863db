//! Process-local stores backed by `tokio::sync::RwLock` maps.
//!
//! These back the `memory` provider and the test suites. State does not
//! survive a restart.

pub mod identity;
pub mod ledger;

pub use identity::MemoryIdentityStore;
pub use ledger::MemoryTokenLedger;
