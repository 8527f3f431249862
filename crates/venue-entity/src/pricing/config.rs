//! Space pricing configuration.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use venue_core::error::AppError;
use venue_core::result::AppResult;

use super::rules::{PeakHourRule, PromoCode, SpecialEvent, TimeBlock, check_price};

/// All pricing rules attached to one space.
///
/// Rule lists keep their configured order; peak-hour matching and time-block
/// tie-breaking depend on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PricingConfig {
    /// Every computed price is zero.
    pub is_free: bool,
    /// Hourly rate.
    pub base_price: Decimal,
    /// Rate applied instead of the hourly rate for bookings of 24 hours or more.
    pub day_rate: Decimal,
    /// Peak-hour surcharges, first match wins.
    pub peak_hours: Vec<PeakHourRule>,
    /// Bundled-duration tiers.
    pub time_blocks: Vec<TimeBlock>,
    /// Redeemable discounts.
    pub promo_codes: Vec<PromoCode>,
    /// Date-specific overrides.
    pub special_events: Vec<SpecialEvent>,
}

impl PricingConfig {
    /// A configuration where every booking costs nothing.
    pub fn free() -> Self {
        Self {
            is_free: true,
            ..Self::default()
        }
    }

    /// A plain hourly configuration with no rules.
    pub fn hourly(base_price: Decimal) -> Self {
        Self {
            base_price,
            ..Self::default()
        }
    }

    /// Validate every rule and the configuration-wide invariants.
    pub fn validate(&self) -> AppResult<()> {
        check_price(self.base_price, "Base price")?;
        check_price(self.day_rate, "Day rate")?;
        if !self.is_free && self.base_price <= Decimal::ZERO && self.day_rate <= Decimal::ZERO {
            return Err(AppError::validation(
                "Non-free spaces must have a base price or day rate",
            ));
        }

        for rule in &self.peak_hours {
            rule.validate()?;
        }
        for block in &self.time_blocks {
            block.validate()?;
        }

        let mut codes = HashSet::new();
        for promo in &self.promo_codes {
            promo.validate()?;
            if !codes.insert(promo.code.as_str()) {
                return Err(AppError::validation(format!(
                    "Duplicate promo code '{}'",
                    promo.code
                )));
            }
        }

        for event in &self.special_events {
            event.validate()?;
        }

        Ok(())
    }

    /// Find a promo entry by exact code.
    pub fn promo(&self, code: &str) -> Option<&PromoCode> {
        self.promo_codes.iter().find(|p| p.code == code)
    }
}
