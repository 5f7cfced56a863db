//! Estate Server: property-listing backend
//!
//! Main entry point that wires the stores, the auth services, and the HTTP
//! layer together and starts the server.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use estate_api::{AppState, build_app};
use estate_core::config::{AppConfig, StoreProvider};
use estate_core::error::{AppError, ErrorKind};
use estate_database::store::{IdentityStore, TokenLedger};
use estate_database::{
    DatabasePool, MemoryIdentityStore, MemoryTokenLedger, TokenRepository, UserRepository,
};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let base = std::env::var("ESTATE_CONFIG").unwrap_or_else(|_| "config/default".to_string());
    let env = std::env::var("ESTATE_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load_from(&base, &env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting estate server v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Stores ───────────────────────────────────────────
    let (identities, ledger, database): (Arc<dyn IdentityStore>, Arc<dyn TokenLedger>, _) =
        match config.database.provider {
            StoreProvider::Postgres => {
                let pool = DatabasePool::connect(&config.database).await?;
                tracing::info!("Running database migrations...");
                estate_database::migration::run_migrations(pool.pool()).await?;
                (
                    Arc::new(UserRepository::new(pool.pool().clone())),
                    Arc::new(TokenRepository::new(pool.pool().clone())),
                    Some(pool),
                )
            }
            StoreProvider::Memory => {
                tracing::warn!("Using in-memory stores; all accounts are lost on restart");
                let ledger = MemoryTokenLedger::new();
                (
                    Arc::new(MemoryIdentityStore::with_ledger(ledger.clone())),
                    Arc::new(ledger),
                    None,
                )
            }
        };

    // ── Step 2: Auth services and HTTP app ───────────────────────
    let state = AppState::new(config.clone(), identities, ledger, database.clone())?;
    let app = build_app(state, &config.server);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, format!("Failed to bind {addr}"), e))?;

    tracing::info!("Estate server listening on {}", addr);

    // ── Step 3: Graceful shutdown ────────────────────────────────
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, draining connections...");
            let _ = shutdown_tx.send(true);
        })
        .into_future();

    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    tokio::select! {
        result = server => {
            result.map_err(|e| AppError::internal(format!("Server error: {e}")))?;
        }
        _ = async {
            let _ = shutdown_rx.wait_for(|stopping| *stopping).await;
            tokio::time::sleep(grace).await;
        } => {
            tracing::warn!(
                grace_seconds = grace.as_secs(),
                "Grace period elapsed; closing open connections"
            );
        }
    }

    if let Some(pool) = database {
        pool.close().await;
    }

    tracing::info!("Estate server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
