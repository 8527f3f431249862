//! In-memory booking store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;

use venue_core::error::AppError;
use venue_core::result::AppResult;
use venue_core::types::pagination::{PageRequest, PageResponse};
use venue_core::types::{BookingId, SpaceId};
use venue_entity::booking::{Booking, BookingStats, BookingStatus, has_capacity, overlapping_seats};

use crate::store::{BookingFilter, BookingStore};

/// [`BookingStore`] keeping bookings in a process-local map.
#[derive(Debug, Clone, Default)]
pub struct MemoryBookingStore {
    bookings: Arc<Mutex<HashMap<BookingId, Booking>>>,
}

impl MemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn active_on(
    bookings: &HashMap<BookingId, Booking>,
    space_id: SpaceId,
    date: NaiveDate,
) -> Vec<Booking> {
    bookings
        .values()
        .filter(|b| b.space_id == space_id && b.date == date && b.status.is_active())
        .cloned()
        .collect()
}

#[async_trait]
impl BookingStore for MemoryBookingStore {
    async fn find_active_on_date(
        &self,
        space_id: SpaceId,
        date: NaiveDate,
    ) -> AppResult<Vec<Booking>> {
        Ok(active_on(&*self.bookings.lock().await, space_id, date))
    }

    async fn insert_within_capacity(&self, booking: &Booking, capacity: i32) -> AppResult<Booking> {
        let mut bookings = self.bookings.lock().await;

        let active = active_on(&bookings, booking.space_id, booking.date);
        let booked = overlapping_seats(&active, &booking.window());
        if !has_capacity(capacity, booked, booking.seats) {
            return Err(AppError::capacity_exceeded(
                "Space is not available for the selected time and seats",
            ));
        }

        bookings.insert(booking.id, booking.clone());
        Ok(booking.clone())
    }

    async fn find_by_id(&self, id: BookingId) -> AppResult<Option<Booking>> {
        Ok(self.bookings.lock().await.get(&id).cloned())
    }

    async fn list(
        &self,
        filter: &BookingFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Booking>> {
        let mut matching: Vec<Booking> = self
            .bookings
            .lock()
            .await
            .values()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page.paginate(matching))
    }

    async fn update(&self, booking: &Booking, expected: BookingStatus) -> AppResult<Booking> {
        let mut bookings = self.bookings.lock().await;
        let stored = bookings
            .get_mut(&booking.id)
            .ok_or_else(|| AppError::not_found(format!("Booking {} not found", booking.id)))?;
        if stored.status != expected {
            return Err(AppError::invalid_state(format!(
                "Booking is already {}",
                stored.status
            )));
        }
        *stored = booking.clone();
        Ok(booking.clone())
    }

    async fn stats(&self, filter: &BookingFilter) -> AppResult<BookingStats> {
        let bookings = self.bookings.lock().await;
        Ok(BookingStats::from_bookings(
            bookings.values().filter(|b| filter.matches(b)),
        ))
    }
}
