//! Booking entity model and lifecycle transitions.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use venue_core::error::AppError;
use venue_core::result::AppResult;
use venue_core::types::{BookingId, SpaceId, UserId};

use super::status::BookingStatus;
use super::window::TimeWindow;

/// A reservation of seats in a space for a time window.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    pub space_id: SpaceId,
    pub user_id: UserId,
    pub date: NaiveDate,
    #[serde(with = "clock")]
    pub start_time: NaiveTime,
    #[serde(with = "clock")]
    pub end_time: NaiveTime,
    pub seats: i32,
    /// Price fixed when the booking was created.
    pub amount: Decimal,
    pub status: BookingStatus,
    /// Promo code redeemed by this booking.
    pub promo_code: Option<String>,
    pub order_id: Option<String>,
    pub payment_id: Option<String>,
    #[serde(skip_serializing, default)]
    pub payment_signature: Option<String>,
    pub cancellation_reason: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub refund_amount: Option<Decimal>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// The booked window.
    pub fn window(&self) -> TimeWindow {
        TimeWindow {
            date: self.date,
            start: self.start_time,
            end: self.end_time,
        }
    }

    /// Start instant, with the booking's wall-clock time read as UTC.
    pub fn starts_at(&self) -> DateTime<Utc> {
        self.date.and_time(self.start_time).and_utc()
    }

    /// Move a pending booking to confirmed, recording payment identifiers.
    pub fn confirm(
        &mut self,
        order_id: Option<String>,
        payment_id: Option<String>,
        signature: Option<String>,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        if self.status != BookingStatus::Pending {
            return Err(AppError::invalid_state(format!(
                "Cannot confirm a {} booking",
                self.status
            )));
        }
        self.status = BookingStatus::Confirmed;
        if order_id.is_some() {
            self.order_id = order_id;
        }
        if payment_id.is_some() {
            self.payment_id = payment_id;
        }
        if signature.is_some() {
            self.payment_signature = signature;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Cancel the booking; a second cancellation fails.
    pub fn cancel(&mut self, reason: Option<String>, now: DateTime<Utc>) -> AppResult<()> {
        if self.status == BookingStatus::Cancelled {
            return Err(AppError::invalid_state("Booking is already cancelled"));
        }
        self.status = BookingStatus::Cancelled;
        self.cancellation_reason = Some(reason.unwrap_or_default());
        self.cancelled_at = Some(now);
        self.refund_amount = Some(self.amount);
        self.updated_at = now;
        Ok(())
    }
}

/// Data required to create a new booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBooking {
    pub space_id: SpaceId,
    pub user_id: UserId,
    pub window: TimeWindow,
    pub seats: i32,
    pub amount: Decimal,
    pub promo_code: Option<String>,
    pub order_id: Option<String>,
    pub notes: Option<String>,
}

impl CreateBooking {
    /// Materialize a pending booking.
    pub fn into_booking(self, now: DateTime<Utc>) -> Booking {
        Booking {
            id: BookingId::new(),
            space_id: self.space_id,
            user_id: self.user_id,
            date: self.window.date,
            start_time: self.window.start,
            end_time: self.window.end,
            seats: self.seats,
            amount: self.amount,
            status: BookingStatus::Pending,
            promo_code: self.promo_code,
            order_id: self.order_id,
            payment_id: None,
            payment_signature: None,
            cancellation_reason: None,
            cancelled_at: None,
            refund_amount: None,
            notes: self.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

/// `HH:MM` serde representation for clock times.
pub mod clock {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let value = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&value, FORMAT).map_err(serde::de::Error::custom)
    }
}
