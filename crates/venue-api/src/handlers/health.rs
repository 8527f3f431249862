//! Health check handler.

use axum::Json;
use axum::extract::State;
use chrono::Utc;
use tracing::warn;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let (database, database_healthy) = match &state.database {
        Some(pool) => {
            let healthy = match pool.health_check().await {
                Ok(ok) => ok,
                Err(e) => {
                    warn!(error = %e, "Database health check failed");
                    false
                }
            };
            ("postgres", healthy)
        }
        None => ("memory", true),
    };

    let now = Utc::now();
    Json(ApiResponse::ok(HealthResponse {
        status: if database_healthy { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
        database_healthy,
        started_at: state.started_at,
        uptime_seconds: (now - state.started_at).num_seconds(),
    }))
}
