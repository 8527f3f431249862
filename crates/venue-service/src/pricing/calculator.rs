//! Multi-rule price computation.
//!
//! Rules run in a fixed order: base or day rate, peak multiplier, time-block
//! discount, promo discount. A special event on the start date replaces the
//! whole result, and free spaces skip everything. Amounts are never rounded
//! between steps. Arithmetic saturates instead of overflowing, so a
//! configuration that skipped validation still yields a price.

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Utc};
use rust_decimal::Decimal;

use venue_entity::pricing::{PriceBreakdown, PriceLine, PricingConfig, TimeBlock};

const SECONDS_PER_HOUR: i64 = 3600;

/// Whole hours billed for a window, rounded up.
pub fn billable_hours(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    let seconds = (end - start).num_seconds().max(0);
    (seconds + SECONDS_PER_HOUR - 1) / SECONDS_PER_HOUR
}

/// Compute the price of booking `[start, end)` under `pricing`.
///
/// `promo_code` is matched exactly; unknown, expired, or exhausted codes give
/// no discount. Redemption counts are read, never changed.
pub fn calculate_price(
    pricing: &PricingConfig,
    start: NaiveDateTime,
    end: NaiveDateTime,
    promo_code: Option<&str>,
    now: DateTime<Utc>,
) -> PriceBreakdown {
    if pricing.is_free {
        return PriceBreakdown::free();
    }

    if let Some(event) = pricing
        .special_events
        .iter()
        .find(|e| e.date == start.date())
    {
        return PriceBreakdown::special_event(event.price);
    }

    let hours = billable_hours(start, end);
    let is_full_day = hours >= 24;
    let mut lines = Vec::new();

    let mut amount = if is_full_day {
        lines.push(PriceLine::new("Day rate", pricing.day_rate));
        pricing.day_rate
    } else {
        let base = pricing.base_price.saturating_mul(Decimal::from(hours));
        lines.push(PriceLine::new(format!("Base rate ({hours} hours)"), base));
        base
    };

    let day_of_week = start.weekday().num_days_from_sunday() as u8;
    let hour = start.hour() as u8;
    let peak_multiplier = pricing
        .peak_hours
        .iter()
        .find(|rule| rule.matches(day_of_week, hour))
        .map(|rule| rule.multiplier)
        .unwrap_or(Decimal::ONE);

    if peak_multiplier > Decimal::ONE {
        let increase = amount.saturating_mul(peak_multiplier - Decimal::ONE);
        amount = amount.saturating_add(increase);
        lines.push(PriceLine::new("Peak hour adjustment", increase));
    }

    let time_block_discount = best_time_block(&pricing.time_blocks, hours)
        .map(|block| (amount - block.price).max(Decimal::ZERO))
        .unwrap_or(Decimal::ZERO);
    if time_block_discount > Decimal::ZERO {
        lines.push(PriceLine::new("Time block discount", -time_block_discount));
    }
    let after_time_block = amount - time_block_discount;

    let promo_discount = promo_code
        .and_then(|code| {
            pricing
                .promo_codes
                .iter()
                .find(|p| p.is_redeemable(code, now))
        })
        .map(|promo| {
            after_time_block.saturating_mul(promo.discount_percentage) / Decimal::ONE_HUNDRED
        })
        .unwrap_or(Decimal::ZERO);
    if promo_discount > Decimal::ZERO {
        lines.push(PriceLine::new("Promo code discount", -promo_discount));
    }

    PriceBreakdown {
        base_price: pricing.base_price,
        peak_multiplier,
        time_block_discount,
        promo_discount,
        final_price: after_time_block - promo_discount,
        breakdown: lines,
    }
}

/// The largest block not longer than `hours`; the first one wins a tie.
fn best_time_block(blocks: &[TimeBlock], hours: i64) -> Option<&TimeBlock> {
    blocks
        .iter()
        .filter(|b| i64::from(b.hours) <= hours)
        .fold(None, |best: Option<&TimeBlock>, block| match best {
            Some(current) if current.hours >= block.hours => Some(current),
            _ => Some(block),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, TimeZone};
    use venue_entity::pricing::{MAX_MULTIPLIER, MAX_PRICE, PeakHourRule, PromoCode, SpecialEvent};

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M").unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 5, 9, 0, 0).unwrap()
    }

    fn welcome10(current_uses: i32) -> PromoCode {
        let mut promo = PromoCode::new(
            "WELCOME10",
            Decimal::TEN,
            now() - Duration::days(1),
            now() + Duration::days(30),
            5,
        )
        .unwrap();
        promo.current_uses = current_uses;
        promo
    }

    #[test]
    fn test_plain_hourly_rate() {
        let pricing = PricingConfig::hourly(Decimal::from(100));
        let price = calculate_price(
            &pricing,
            at("2025-01-10", "10:00"),
            at("2025-01-10", "12:00"),
            None,
            now(),
        );

        assert_eq!(price.final_price, Decimal::from(200));
        assert_eq!(price.base_price, Decimal::from(100));
        assert_eq!(price.peak_multiplier, Decimal::ONE);
        assert_eq!(price.breakdown.len(), 1);
        assert_eq!(price.breakdown[0].description, "Base rate (2 hours)");
    }

    #[test]
    fn test_friday_evening_peak() {
        let mut pricing = PricingConfig::hourly(Decimal::from(100));
        pricing
            .peak_hours
            .push(PeakHourRule::new(5, 18, 22, Decimal::new(15, 1)).unwrap());

        // 2025-01-10 is a Friday.
        let price = calculate_price(
            &pricing,
            at("2025-01-10", "19:00"),
            at("2025-01-10", "21:00"),
            None,
            now(),
        );

        assert_eq!(price.final_price, Decimal::from(300));
        assert_eq!(price.peak_multiplier, Decimal::new(15, 1));
        assert_eq!(price.breakdown[1].description, "Peak hour adjustment");
        assert_eq!(price.breakdown[1].amount, Decimal::from(100));
    }

    #[test]
    fn test_peak_ignores_end_time_and_takes_first_match() {
        let mut pricing = PricingConfig::hourly(Decimal::from(100));
        pricing.peak_hours = vec![
            PeakHourRule::new(5, 18, 22, Decimal::new(15, 1)).unwrap(),
            PeakHourRule::new(5, 17, 23, Decimal::from(3)).unwrap(),
        ];

        let off_peak_start = calculate_price(
            &pricing,
            at("2025-01-10", "16:00"),
            at("2025-01-10", "20:00"),
            None,
            now(),
        );
        assert_eq!(off_peak_start.final_price, Decimal::from(400));

        let first_match = calculate_price(
            &pricing,
            at("2025-01-10", "18:00"),
            at("2025-01-10", "19:00"),
            None,
            now(),
        );
        assert_eq!(first_match.final_price, Decimal::from(150));
    }

    #[test]
    fn test_time_block_discount() {
        let mut pricing = PricingConfig::hourly(Decimal::from(100));
        pricing
            .time_blocks
            .push(TimeBlock::new(4, Decimal::from(300), "Half day").unwrap());

        let price = calculate_price(
            &pricing,
            at("2025-01-08", "09:00"),
            at("2025-01-08", "13:00"),
            None,
            now(),
        );

        assert_eq!(price.time_block_discount, Decimal::from(100));
        assert_eq!(price.final_price, Decimal::from(300));
        assert_eq!(price.breakdown[1].amount, Decimal::from(-100));
    }

    #[test]
    fn test_time_block_picks_largest_fitting_not_cheapest() {
        let mut pricing = PricingConfig::hourly(Decimal::from(100));
        pricing.time_blocks = vec![
            TimeBlock::new(2, Decimal::from(50), "").unwrap(),
            TimeBlock::new(4, Decimal::from(350), "").unwrap(),
            TimeBlock::new(8, Decimal::from(100), "").unwrap(),
        ];

        let price = calculate_price(
            &pricing,
            at("2025-01-08", "09:00"),
            at("2025-01-08", "14:00"),
            None,
            now(),
        );
        assert_eq!(price.time_block_discount, Decimal::from(150));
        assert_eq!(price.final_price, Decimal::from(350));
    }

    #[test]
    fn test_time_block_tie_keeps_first() {
        let blocks = vec![
            TimeBlock::new(4, Decimal::from(300), "first").unwrap(),
            TimeBlock::new(4, Decimal::from(100), "second").unwrap(),
        ];
        assert_eq!(best_time_block(&blocks, 6).unwrap().description, "first");
        assert!(best_time_block(&blocks, 3).is_none());
    }

    #[test]
    fn test_expensive_block_never_adds() {
        let mut pricing = PricingConfig::hourly(Decimal::from(100));
        pricing
            .time_blocks
            .push(TimeBlock::new(2, Decimal::from(500), "").unwrap());

        let price = calculate_price(
            &pricing,
            at("2025-01-08", "09:00"),
            at("2025-01-08", "11:00"),
            None,
            now(),
        );
        assert_eq!(price.time_block_discount, Decimal::ZERO);
        assert_eq!(price.final_price, Decimal::from(200));
        assert_eq!(price.breakdown.len(), 1);
    }

    #[test]
    fn test_promo_discount_and_exhaustion() {
        let mut pricing = PricingConfig::hourly(Decimal::from(100));
        pricing.promo_codes.push(welcome10(0));
        let (start, end) = (at("2025-01-08", "10:00"), at("2025-01-08", "12:00"));

        let price = calculate_price(&pricing, start, end, Some("WELCOME10"), now());
        assert_eq!(price.promo_discount, Decimal::from(20));
        assert_eq!(price.final_price, Decimal::from(180));
        assert_eq!(price.breakdown.last().unwrap().description, "Promo code discount");

        pricing.promo_codes[0].current_uses = 5;
        let price = calculate_price(&pricing, start, end, Some("WELCOME10"), now());
        assert_eq!(price.promo_discount, Decimal::ZERO);
        assert_eq!(price.final_price, Decimal::from(200));
    }

    #[test]
    fn test_promo_outside_window_or_unknown() {
        let mut pricing = PricingConfig::hourly(Decimal::from(100));
        pricing.promo_codes.push(welcome10(0));
        let (start, end) = (at("2025-01-08", "10:00"), at("2025-01-08", "12:00"));

        let late = now() + Duration::days(31);
        assert_eq!(
            calculate_price(&pricing, start, end, Some("WELCOME10"), late).final_price,
            Decimal::from(200)
        );
        assert_eq!(
            calculate_price(&pricing, start, end, Some("BOGUS"), now()).final_price,
            Decimal::from(200)
        );
    }

    #[test]
    fn test_promo_applies_after_time_block() {
        let mut pricing = PricingConfig::hourly(Decimal::from(100));
        pricing
            .time_blocks
            .push(TimeBlock::new(4, Decimal::from(300), "").unwrap());
        pricing.promo_codes.push(welcome10(0));

        let price = calculate_price(
            &pricing,
            at("2025-01-08", "09:00"),
            at("2025-01-08", "13:00"),
            Some("WELCOME10"),
            now(),
        );
        assert_eq!(price.promo_discount, Decimal::from(30));
        assert_eq!(price.final_price, Decimal::from(270));
    }

    #[test]
    fn test_free_space_short_circuits() {
        let mut pricing = PricingConfig::free();
        pricing.base_price = Decimal::from(500);
        pricing
            .peak_hours
            .push(PeakHourRule::new(5, 0, 23, Decimal::from(2)).unwrap());

        let price = calculate_price(
            &pricing,
            at("2025-01-10", "10:00"),
            at("2025-01-10", "12:00"),
            None,
            now(),
        );
        assert_eq!(price, PriceBreakdown::free());
    }

    #[test]
    fn test_special_event_overrides_every_rule() {
        let mut pricing = PricingConfig::hourly(Decimal::from(100));
        pricing
            .peak_hours
            .push(PeakHourRule::new(5, 0, 23, Decimal::from(2)).unwrap());
        pricing.promo_codes.push(welcome10(0));
        pricing.special_events.push(
            SpecialEvent::new(
                "New Year Gala",
                NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
                Decimal::from(999),
                "",
            )
            .unwrap(),
        );

        let price = calculate_price(
            &pricing,
            at("2025-01-10", "19:00"),
            at("2025-01-10", "23:00"),
            Some("WELCOME10"),
            now(),
        );
        assert_eq!(price.final_price, Decimal::from(999));
        assert_eq!(price.base_price, Decimal::from(999));
        assert_eq!(price.breakdown.len(), 1);
        assert_eq!(price.breakdown[0].description, "Special event price");
    }

    #[test]
    fn test_partial_hours_round_up() {
        let pricing = PricingConfig::hourly(Decimal::from(100));
        let price = calculate_price(
            &pricing,
            at("2025-01-08", "10:00"),
            at("2025-01-08", "11:30"),
            None,
            now(),
        );
        assert_eq!(price.final_price, Decimal::from(200));
        assert_eq!(billable_hours(at("2025-01-08", "10:00"), at("2025-01-08", "10:01")), 1);
    }

    #[test]
    fn test_full_day_uses_day_rate() {
        let pricing = PricingConfig {
            base_price: Decimal::from(100),
            day_rate: Decimal::from(1500),
            ..PricingConfig::default()
        };
        let price = calculate_price(
            &pricing,
            at("2025-01-08", "00:00"),
            at("2025-01-09", "00:00"),
            None,
            now(),
        );
        assert_eq!(price.final_price, Decimal::from(1500));
        assert_eq!(price.breakdown[0].description, "Day rate");
    }

    #[test]
    fn test_largest_valid_config_prices_exactly() {
        let mut pricing = PricingConfig::hourly(MAX_PRICE);
        pricing
            .peak_hours
            .push(PeakHourRule::new(5, 0, 23, MAX_MULTIPLIER).unwrap());
        assert!(pricing.validate().is_ok());

        // Friday, 23 billable hours.
        let price = calculate_price(
            &pricing,
            at("2025-01-10", "00:00"),
            at("2025-01-10", "23:00"),
            None,
            now(),
        );
        assert_eq!(price.final_price, MAX_PRICE * Decimal::from(23) * MAX_MULTIPLIER);
    }

    #[test]
    fn test_unvalidated_huge_rate_saturates() {
        let pricing = PricingConfig::hourly(Decimal::MAX);
        let price = calculate_price(
            &pricing,
            at("2025-01-08", "10:00"),
            at("2025-01-08", "12:00"),
            None,
            now(),
        );
        assert_eq!(price.final_price, Decimal::MAX);
    }
}
