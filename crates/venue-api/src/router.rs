//! Route definitions for the venue booking HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post, put},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the Axum router with all routes and request logging.
///
/// CORS, tracing, and timeouts are added by [`crate::app::build_app`].
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(health_routes())
        .merge(space_routes())
        .merge(booking_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Space CRUD and price preview
fn space_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/spaces",
            get(handlers::space::list_spaces).post(handlers::space::create_space),
        )
        .route("/spaces/mine", get(handlers::space::list_my_spaces))
        .route(
            "/spaces/{id}",
            get(handlers::space::get_space)
                .put(handlers::space::update_space)
                .delete(handlers::space::delete_space),
        )
        .route("/spaces/{id}/quote", post(handlers::space::quote_price))
}

/// Availability, booking lifecycle, and payment confirmation
fn booking_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/bookings/availability/{space_id}",
            get(handlers::booking::check_availability),
        )
        .route(
            "/bookings",
            get(handlers::booking::list_bookings).post(handlers::booking::create_booking),
        )
        .route("/bookings/mine", get(handlers::booking::list_my_bookings))
        .route("/bookings/stats", get(handlers::booking::booking_stats))
        .route("/bookings/{id}", get(handlers::booking::get_booking))
        .route("/bookings/{id}/cancel", put(handlers::booking::cancel_booking))
        .route(
            "/bookings/{id}/status",
            put(handlers::booking::update_booking_status),
        )
        .route(
            "/bookings/{id}/payment",
            post(handlers::booking::confirm_payment),
        )
}
