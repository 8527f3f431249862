//! Pricing value objects.

pub mod breakdown;
pub mod config;
pub mod rules;

pub use breakdown::{PriceBreakdown, PriceLine};
pub use config::PricingConfig;
pub use rules::{MAX_MULTIPLIER, MAX_PRICE, PeakHourRule, PromoCode, SpecialEvent, TimeBlock};
