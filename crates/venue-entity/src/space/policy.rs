//! Booking and cancellation policy attached to a space.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use venue_core::error::AppError;
use venue_core::result::AppResult;

/// How long before the start a booking's own user may still cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "cancellation_policy")]
pub enum CancellationPolicy {
    /// Up to 24 hours before start.
    #[default]
    #[serde(rename = "24h")]
    #[sqlx(rename = "24h")]
    Hours24,
    /// Up to 48 hours before start.
    #[serde(rename = "48h")]
    #[sqlx(rename = "48h")]
    Hours48,
    /// Up to 7 days before start.
    #[serde(rename = "7d")]
    #[sqlx(rename = "7d")]
    Days7,
    /// Users cannot self-cancel.
    #[serde(rename = "no")]
    #[sqlx(rename = "no")]
    NoCancellation,
}

impl CancellationPolicy {
    /// Minimum notice required, or `None` when self-cancellation is off.
    pub fn notice(&self) -> Option<Duration> {
        match self {
            Self::Hours24 => Some(Duration::hours(24)),
            Self::Hours48 => Some(Duration::hours(48)),
            Self::Days7 => Some(Duration::days(7)),
            Self::NoCancellation => None,
        }
    }

    /// Whether a user cancelling at `now` a booking starting at `start` is allowed.
    pub fn allows(&self, now: DateTime<Utc>, start: DateTime<Utc>) -> bool {
        match self.notice() {
            Some(notice) => start - now >= notice,
            None => false,
        }
    }

    /// Return the wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hours24 => "24h",
            Self::Hours48 => "48h",
            Self::Days7 => "7d",
            Self::NoCancellation => "no",
        }
    }
}

impl fmt::Display for CancellationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Duration and lead-time limits for new bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingPolicy {
    pub min_booking_hours: i32,
    pub max_booking_hours: i32,
    pub advance_booking_days: i32,
    pub cancellation_policy: CancellationPolicy,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            min_booking_hours: 1,
            max_booking_hours: 24,
            advance_booking_days: 30,
            cancellation_policy: CancellationPolicy::default(),
        }
    }
}

impl BookingPolicy {
    /// Validate the policy's own bounds.
    pub fn validate(&self) -> AppResult<()> {
        if self.min_booking_hours < 1 {
            return Err(AppError::validation("Minimum booking duration must be at least 1 hour"));
        }
        if self.max_booking_hours < self.min_booking_hours {
            return Err(AppError::validation(
                "Maximum booking duration must not be below the minimum",
            ));
        }
        if self.advance_booking_days < 0 {
            return Err(AppError::validation("Advance booking days must not be negative"));
        }
        Ok(())
    }

    /// Check a requested duration (whole hours, rounded up) against the limits.
    pub fn check_duration(&self, hours: i64) -> AppResult<()> {
        if hours < i64::from(self.min_booking_hours) {
            return Err(AppError::validation(format!(
                "Booking must be at least {} hour(s)",
                self.min_booking_hours
            )));
        }
        if hours > i64::from(self.max_booking_hours) {
            return Err(AppError::validation(format!(
                "Booking must not exceed {} hour(s)",
                self.max_booking_hours
            )));
        }
        Ok(())
    }

    /// Check that `start` is not in the past and within the advance window.
    pub fn check_lead_time(&self, now: DateTime<Utc>, start: DateTime<Utc>) -> AppResult<()> {
        if start < now {
            return Err(AppError::validation("Cannot book a slot in the past"));
        }
        if start - now > Duration::days(i64::from(self.advance_booking_days)) {
            return Err(AppError::validation(format!(
                "Bookings open at most {} day(s) in advance",
                self.advance_booking_days
            )));
        }
        Ok(())
    }
}
