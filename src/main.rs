//! Venue booking server.
//!
//! Main entry point that wires all crates together and starts the server.

use tracing_subscriber::{EnvFilter, fmt};

use venue_core::config::AppConfig;
use venue_core::error::AppError;

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
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load `config/default.toml`, the `VENUE_ENV` overlay, and `VENUE__*` variables.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("VENUE_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
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
    tracing::info!("Starting venue booking server v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Stores (PostgreSQL + migrations, or in-memory) ───
    tracing::info!(
        provider = ?config.database.provider,
        slot_locks = config.booking.slot_locks,
        enforce_policy = config.booking.enforce_policy,
        "Initializing stores..."
    );
    let state = venue_api::app::build_state(config).await?;
    tracing::info!("Stores and services initialized");

    // ── Step 2: Serve HTTP until shutdown ────────────────────────
    venue_api::serve(state).await
}
