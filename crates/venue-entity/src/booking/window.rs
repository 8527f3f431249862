//! Booking time windows and the seat-overlap rule.
//!
//! Windows are half-open `[start, end)`: a booking ending at 12:00 and one
//! starting at 12:00 do not overlap.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use venue_core::error::AppError;
use venue_core::result::AppResult;

use super::model::Booking;

/// Parse an `HH:MM` clock time.
pub fn parse_clock(value: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| AppError::validation(format!("Invalid time '{value}', expected HH:MM")))
}

/// Parse an ISO-8601 calendar date (`YYYY-MM-DD`).
pub fn parse_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date '{value}', expected YYYY-MM-DD")))
}

/// A non-empty time range within one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeWindow {
    /// Build a window; `end` must be strictly after `start`.
    pub fn new(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> AppResult<Self> {
        if end <= start {
            return Err(AppError::validation("End time must be after start time"));
        }
        Ok(Self { date, start, end })
    }

    /// Build a window from wire strings.
    pub fn parse(date: &str, start: &str, end: &str) -> AppResult<Self> {
        Self::new(parse_date(date)?, parse_clock(start)?, parse_clock(end)?)
    }

    /// Whether two windows on the same day share any instant.
    pub fn overlaps(&self, start: NaiveTime, end: NaiveTime) -> bool {
        self.start < end && self.end > start
    }

    pub fn start_at(&self) -> NaiveDateTime {
        self.date.and_time(self.start)
    }

    pub fn end_at(&self) -> NaiveDateTime {
        self.date.and_time(self.end)
    }
}

/// Seats held by active bookings that overlap `window`.
///
/// Only bookings on the window's date are counted.
pub fn overlapping_seats(bookings: &[Booking], window: &TimeWindow) -> i64 {
    bookings
        .iter()
        .filter(|b| b.status.is_active() && b.date == window.date)
        .filter(|b| window.overlaps(b.start_time, b.end_time))
        .map(|b| i64::from(b.seats))
        .sum()
}

/// Whether `requested` more seats fit next to `booked` in `capacity`.
pub fn has_capacity(capacity: i32, booked: i64, requested: i32) -> bool {
    booked + i64::from(requested) <= i64::from(capacity)
}
