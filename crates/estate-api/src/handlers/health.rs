//! Health check handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match &state.database {
        None => "memory",
        Some(pool) => match pool.health_check().await {
            Ok(true) => "connected",
            _ => "unavailable",
        },
    };

    Json(HealthResponse {
        status: if database == "unavailable" { "degraded" } else { "ok" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
    })
}
