//! Application state shared across all handlers via Axum's `State` extractor.

use std::sync::Arc;

use estate_auth::{AccountManager, AuthorizationPolicy, RequestGate, TokenIssuer};
use estate_core::config::AppConfig;
use estate_core::result::AppResult;
use estate_database::DatabasePool;
use estate_database::store::{IdentityStore, TokenLedger};

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Connection pool, absent when running on the in-memory stores.
    pub database: Option<DatabasePool>,
    /// Token verification for inbound requests.
    pub gate: Arc<RequestGate>,
    /// Path-to-role table.
    pub policy: Arc<AuthorizationPolicy>,
    /// Registration, login, refresh, logout, and password reset.
    pub issuer: Arc<TokenIssuer>,
    /// Account administration.
    pub accounts: Arc<AccountManager>,
}

impl AppState {
    /// Wire the auth services over one identity store and one token ledger.
    pub fn new(
        config: AppConfig,
        identities: Arc<dyn IdentityStore>,
        ledger: Arc<dyn TokenLedger>,
        database: Option<DatabasePool>,
    ) -> AppResult<Self> {
        let issuer = TokenIssuer::new(&config.auth, identities.clone(), ledger.clone())?;
        let gate = RequestGate::new(&config.auth, identities.clone(), ledger.clone());
        let accounts = AccountManager::new(identities, ledger);

        Ok(Self {
            config: Arc::new(config),
            database,
            gate: Arc::new(gate),
            policy: Arc::new(AuthorizationPolicy::standard()),
            issuer: Arc::new(issuer),
            accounts: Arc::new(accounts),
        })
    }
}
