//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use venue_auth::JwtDecoder;
use venue_core::config::AppConfig;
use venue_core::result::AppResult;
use venue_database::{BookingStore, DatabasePool, SpaceStore};
use venue_service::{BookingService, HmacPaymentVerifier, SlotLocks, SpaceService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are cheap to clone across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Process start, for the health endpoint
    pub started_at: DateTime<Utc>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL pool; `None` with the in-memory provider
    pub database: Option<DatabasePool>,
    /// Per-slot booking locks
    pub slot_locks: Arc<SlotLocks>,

    // ── Auth ─────────────────────────────────────────────────
    /// Access token validator
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────
    /// Space management service
    pub space_service: Arc<SpaceService>,
    /// Booking lifecycle service
    pub booking_service: Arc<BookingService>,
}

impl AppState {
    /// Wire services on top of the given stores.
    pub fn new(
        config: AppConfig,
        database: Option<DatabasePool>,
        spaces: Arc<dyn SpaceStore>,
        bookings: Arc<dyn BookingStore>,
    ) -> AppResult<Self> {
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
        let verifier = Arc::new(HmacPaymentVerifier::new(&config.payment.signature_secret)?);
        let slot_locks = Arc::new(SlotLocks::new());

        let space_service = Arc::new(SpaceService::new(Arc::clone(&spaces)));
        let booking_service = Arc::new(BookingService::new(
            spaces,
            bookings,
            Arc::clone(&slot_locks),
            verifier,
            config.booking.clone(),
        ));

        Ok(Self {
            config: Arc::new(config),
            started_at: Utc::now(),
            database,
            slot_locks,
            jwt_decoder,
            space_service,
            booking_service,
        })
    }
}
