//! Booking orchestration.

pub mod service;

pub use service::{BookingService, CreateBookingRequest, PaymentConfirmation};
