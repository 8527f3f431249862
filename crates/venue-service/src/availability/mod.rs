//! Seat availability checks and per-slot serialization.

pub mod checker;
pub mod locks;

pub use checker::{Availability, AvailabilityChecker};
pub use locks::SlotLocks;
