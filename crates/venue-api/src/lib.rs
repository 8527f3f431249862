//! # venue-api
//!
//! HTTP API layer for the venue booking service built on Axum.
//!
//! Provides the REST endpoints for spaces and bookings, middleware
//! (request logging, CORS, timeouts), extractors, DTOs, and the mapping
//! from `AppError` to HTTP responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, serve};
pub use state::AppState;
