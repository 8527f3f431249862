//! Individual pricing rule records.
//!
//! Each rule has a validating constructor; [`super::PricingConfig::validate`]
//! re-checks the same invariants for records that arrive deserialized.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use venue_core::error::AppError;
use venue_core::result::AppResult;

/// Largest accepted price or rate, in currency units.
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Largest accepted peak-hour multiplier.
pub const MAX_MULTIPLIER: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Check that a configured amount is within `0..=MAX_PRICE`.
pub(crate) fn check_price(price: Decimal, what: &str) -> AppResult<()> {
    if price.is_sign_negative() {
        return Err(AppError::validation(format!("{what} must not be negative")));
    }
    if price > MAX_PRICE {
        return Err(AppError::validation(format!("{what} must not exceed {MAX_PRICE}")));
    }
    Ok(())
}

/// Surcharge applied when a booking starts inside a weekly hour range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeakHourRule {
    /// Day of week, 0 = Sunday through 6 = Saturday.
    pub day_of_week: u8,
    /// First hour of the range (inclusive), 0-23.
    pub start_hour: u8,
    /// End hour of the range (exclusive), 0-23.
    pub end_hour: u8,
    /// Price multiplier, at least 1.
    pub multiplier: Decimal,
}

impl PeakHourRule {
    /// Build a validated peak-hour rule.
    pub fn new(day_of_week: u8, start_hour: u8, end_hour: u8, multiplier: Decimal) -> AppResult<Self> {
        let rule = Self {
            day_of_week,
            start_hour,
            end_hour,
            multiplier,
        };
        rule.validate()?;
        Ok(rule)
    }

    /// Check the rule's invariants.
    pub fn validate(&self) -> AppResult<()> {
        if self.day_of_week > 6 {
            return Err(AppError::validation(format!(
                "Peak hour dayOfWeek must be 0-6, got {}",
                self.day_of_week
            )));
        }
        if self.start_hour > 23 || self.end_hour > 23 {
            return Err(AppError::validation("Peak hour bounds must be within 0-23"));
        }
        if self.start_hour >= self.end_hour {
            return Err(AppError::validation("Start hour must be before end hour"));
        }
        if self.multiplier < Decimal::ONE {
            return Err(AppError::validation("Peak hour multiplier must be at least 1"));
        }
        if self.multiplier > MAX_MULTIPLIER {
            return Err(AppError::validation(format!(
                "Peak hour multiplier must not exceed {MAX_MULTIPLIER}"
            )));
        }
        Ok(())
    }

    /// Whether a booking starting at `hour` on `day_of_week` falls in this rule.
    pub fn matches(&self, day_of_week: u8, hour: u8) -> bool {
        self.day_of_week == day_of_week && hour >= self.start_hour && hour < self.end_hour
    }
}

/// Bundled-duration price tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBlock {
    /// Bundle length in whole hours.
    pub hours: u32,
    /// Bundle price.
    pub price: Decimal,
    /// Display text.
    #[serde(default)]
    pub description: String,
}

impl TimeBlock {
    /// Build a validated time block.
    pub fn new(hours: u32, price: Decimal, description: impl Into<String>) -> AppResult<Self> {
        let block = Self {
            hours,
            price,
            description: description.into(),
        };
        block.validate()?;
        Ok(block)
    }

    /// Check the block's invariants.
    pub fn validate(&self) -> AppResult<()> {
        if self.hours == 0 {
            return Err(AppError::validation("Time block hours must be positive"));
        }
        check_price(self.price, "Time block price")
    }
}

/// Percentage discount redeemable within a validity window and use budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoCode {
    /// Code the customer types, matched exactly.
    pub code: String,
    /// Discount percentage, 0-100.
    pub discount_percentage: Decimal,
    /// Start of validity (inclusive).
    pub valid_from: DateTime<Utc>,
    /// End of validity (inclusive).
    pub valid_until: DateTime<Utc>,
    /// Maximum number of redemptions.
    pub max_uses: i32,
    /// Redemptions so far.
    #[serde(default)]
    pub current_uses: i32,
}

impl PromoCode {
    /// Build a validated, unused promo code.
    pub fn new(
        code: impl Into<String>,
        discount_percentage: Decimal,
        valid_from: DateTime<Utc>,
        valid_until: DateTime<Utc>,
        max_uses: i32,
    ) -> AppResult<Self> {
        let promo = Self {
            code: code.into(),
            discount_percentage,
            valid_from,
            valid_until,
            max_uses,
            current_uses: 0,
        };
        promo.validate()?;
        Ok(promo)
    }

    /// Check the promo's invariants.
    pub fn validate(&self) -> AppResult<()> {
        if self.code.trim().chars().count() < 3 {
            return Err(AppError::validation("Promo code must be at least 3 characters"));
        }
        if self.discount_percentage.is_sign_negative()
            || self.discount_percentage > Decimal::ONE_HUNDRED
        {
            return Err(AppError::validation(
                "Promo discountPercentage must be between 0 and 100",
            ));
        }
        if self.valid_from >= self.valid_until {
            return Err(AppError::validation("Valid from must be before valid until"));
        }
        if self.max_uses <= 0 {
            return Err(AppError::validation("Promo maxUses must be positive"));
        }
        if self.current_uses < 0 {
            return Err(AppError::validation("Promo currentUses must not be negative"));
        }
        Ok(())
    }

    /// Whether `code` redeems this promo at `now`.
    pub fn is_redeemable(&self, code: &str, now: DateTime<Utc>) -> bool {
        self.code == code
            && self.current_uses < self.max_uses
            && now >= self.valid_from
            && now <= self.valid_until
    }
}

/// Calendar-date price override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialEvent {
    /// Event name.
    pub name: String,
    /// Calendar day the override applies to.
    pub date: NaiveDate,
    /// Flat price for any booking starting that day.
    pub price: Decimal,
    /// Display text.
    #[serde(default)]
    pub description: String,
}

impl SpecialEvent {
    /// Build a validated special event.
    pub fn new(
        name: impl Into<String>,
        date: NaiveDate,
        price: Decimal,
        description: impl Into<String>,
    ) -> AppResult<Self> {
        let event = Self {
            name: name.into(),
            date,
            price,
            description: description.into(),
        };
        event.validate()?;
        Ok(event)
    }

    /// Check the event's invariants.
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Special event name is required"));
        }
        check_price(self.price, "Special event price")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_peak_rule_rejects_inverted_hours() {
        assert!(PeakHourRule::new(5, 22, 18, Decimal::new(15, 1)).is_err());
        assert!(PeakHourRule::new(5, 18, 18, Decimal::new(15, 1)).is_err());
        assert!(PeakHourRule::new(7, 18, 22, Decimal::new(15, 1)).is_err());
        assert!(PeakHourRule::new(5, 18, 22, Decimal::new(9, 1)).is_err());
    }

    #[test]
    fn test_peak_rule_end_hour_is_exclusive() {
        let rule = PeakHourRule::new(5, 18, 22, Decimal::new(15, 1)).unwrap();
        assert!(rule.matches(5, 18));
        assert!(rule.matches(5, 21));
        assert!(!rule.matches(5, 22));
        assert!(!rule.matches(4, 19));
    }

    #[test]
    fn test_promo_window_is_inclusive() {
        let from = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let until = from + Duration::days(30);
        let promo = PromoCode::new("WELCOME10", Decimal::TEN, from, until, 5).unwrap();

        assert!(promo.is_redeemable("WELCOME10", from));
        assert!(promo.is_redeemable("WELCOME10", until));
        assert!(!promo.is_redeemable("WELCOME10", until + Duration::seconds(1)));
        assert!(!promo.is_redeemable("welcome10", from));
    }

    #[test]
    fn test_promo_exhausted() {
        let from = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let mut promo =
            PromoCode::new("WELCOME10", Decimal::TEN, from, from + Duration::days(1), 1).unwrap();
        promo.current_uses = 1;
        assert!(!promo.is_redeemable("WELCOME10", from));
    }

    #[test]
    fn test_promo_validation() {
        let from = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert!(PromoCode::new("AB", Decimal::TEN, from, from + Duration::days(1), 1).is_err());
        assert!(PromoCode::new("ABC", Decimal::from(101), from, from + Duration::days(1), 1).is_err());
        assert!(PromoCode::new("ABC", Decimal::TEN, from, from, 1).is_err());
        assert!(PromoCode::new("ABC", Decimal::TEN, from, from + Duration::days(1), 0).is_err());
    }

    #[test]
    fn test_camel_case_wire_format() {
        let json = r#"{"dayOfWeek":5,"startHour":18,"endHour":22,"multiplier":1.5}"#;
        let rule: PeakHourRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.multiplier, Decimal::new(15, 1));
    }
}
