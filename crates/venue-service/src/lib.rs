//! # venue-service
//!
//! Business logic for the venue booking service. The availability checker
//! and price calculator form the core; the booking and space services
//! orchestrate them against the stores.
//!
//! Services follow constructor injection: all dependencies are provided at
//! construction time via `Arc` references.

pub mod availability;
pub mod booking;
pub mod context;
pub mod payment;
pub mod pricing;
pub mod space;

pub use availability::{Availability, AvailabilityChecker, SlotLocks};
pub use booking::{BookingService, CreateBookingRequest, PaymentConfirmation};
pub use context::RequestContext;
pub use payment::{HmacPaymentVerifier, PaymentVerifier};
pub use pricing::calculate_price;
pub use space::{CreateSpaceRequest, QuoteRequest, SpaceService};
