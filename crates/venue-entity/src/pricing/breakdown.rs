//! Price calculation result.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One labelled step of a price computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceLine {
    /// Human-readable label.
    pub description: String,
    /// Signed contribution; discounts are negative.
    pub amount: Decimal,
}

impl PriceLine {
    /// Create a line.
    pub fn new(description: impl Into<String>, amount: Decimal) -> Self {
        Self {
            description: description.into(),
            amount,
        }
    }
}

/// Itemized output of the price calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    /// The configured hourly rate, not the amount charged. Special events
    /// report their flat price here.
    pub base_price: Decimal,
    /// Multiplier of the matched peak-hour rule, 1 when none matched.
    pub peak_multiplier: Decimal,
    /// Amount taken off by the best fitting time block.
    pub time_block_discount: Decimal,
    /// Amount taken off by the promo code.
    pub promo_discount: Decimal,
    /// Amount charged for the whole window.
    pub final_price: Decimal,
    /// Itemized steps in the order they were applied.
    pub breakdown: Vec<PriceLine>,
}

impl PriceBreakdown {
    /// Breakdown for a free space.
    pub fn free() -> Self {
        Self {
            base_price: Decimal::ZERO,
            peak_multiplier: Decimal::ONE,
            time_block_discount: Decimal::ZERO,
            promo_discount: Decimal::ZERO,
            final_price: Decimal::ZERO,
            breakdown: Vec::new(),
        }
    }

    /// Breakdown for a flat special-event price.
    pub fn special_event(price: Decimal) -> Self {
        Self {
            base_price: price,
            peak_multiplier: Decimal::ONE,
            time_block_discount: Decimal::ZERO,
            promo_discount: Decimal::ZERO,
            final_price: price,
            breakdown: vec![PriceLine::new("Special event price", price)],
        }
    }
}
