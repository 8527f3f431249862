//! Price computation.

pub mod calculator;

pub use calculator::{billable_hours, calculate_price};
