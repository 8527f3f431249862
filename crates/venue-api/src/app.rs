//! Application builder: wires stores, services, router, and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use venue_core::config::{AppConfig, DatabaseProvider};
use venue_core::error::AppError;
use venue_core::result::AppResult;
use venue_database::memory::{MemoryBookingStore, MemorySpaceStore};
use venue_database::repositories::{BookingRepository, SpaceRepository};
use venue_database::{BookingStore, DatabasePool, SpaceStore};

use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// How often idle slot locks are dropped.
const SLOT_PRUNE_INTERVAL: Duration = Duration::from_secs(300);

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    build_router(state)
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Connect the configured store backend and build the application state.
pub async fn build_state(config: AppConfig) -> AppResult<AppState> {
    match config.database.provider {
        DatabaseProvider::Postgres => {
            let database = DatabasePool::connect(&config.database).await?;
            if config.database.run_migrations {
                venue_database::migration::run_migrations(database.pool()).await?;
            }

            let spaces: Arc<dyn SpaceStore> =
                Arc::new(SpaceRepository::new(database.pool().clone()));
            let bookings: Arc<dyn BookingStore> =
                Arc::new(BookingRepository::new(database.pool().clone()));
            AppState::new(config, Some(database), spaces, bookings)
        }
        DatabaseProvider::Memory => {
            info!("Using in-memory stores; data is lost on shutdown");
            let spaces: Arc<dyn SpaceStore> = Arc::new(MemorySpaceStore::new());
            let bookings: Arc<dyn BookingStore> = Arc::new(MemoryBookingStore::new());
            AppState::new(config, None, spaces, bookings)
        }
    }
}

/// Serve the application until Ctrl+C.
pub async fn serve(state: AppState) -> AppResult<()> {
    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let database = state.database.clone();

    let locks = Arc::clone(&state.slot_locks);
    let pruner = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SLOT_PRUNE_INTERVAL);
        loop {
            ticker.tick().await;
            locks.prune();
            debug!(slots = locks.len(), "Pruned idle slot locks");
        }
    });

    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!("Venue booking server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    pruner.abort();
    if let Some(database) = database {
        database.close().await;
    }
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
