//! Aggregate booking counters.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::model::Booking;
use super::status::BookingStatus;

/// Booking counts per status and confirmed revenue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingStats {
    pub total: i64,
    pub pending: i64,
    pub confirmed: i64,
    pub cancelled: i64,
    /// Sum of amounts over confirmed bookings.
    pub total_revenue: Decimal,
}

impl BookingStats {
    /// Fold a set of bookings into counters.
    pub fn from_bookings<'a>(bookings: impl IntoIterator<Item = &'a Booking>) -> Self {
        bookings.into_iter().fold(Self::default(), |mut stats, b| {
            stats.total += 1;
            match b.status {
                BookingStatus::Pending => stats.pending += 1,
                BookingStatus::Confirmed => {
                    stats.confirmed += 1;
                    stats.total_revenue += b.amount;
                }
                BookingStatus::Cancelled => stats.cancelled += 1,
            }
            stats
        })
    }
}
