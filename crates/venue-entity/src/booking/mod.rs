//! Booking domain entities.

pub mod model;
pub mod stats;
pub mod status;
pub mod window;

pub use model::{Booking, CreateBooking};
pub use stats::BookingStats;
pub use status::BookingStatus;
pub use window::{TimeWindow, has_capacity, overlapping_seats, parse_clock, parse_date};
