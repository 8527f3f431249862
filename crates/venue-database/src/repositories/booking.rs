//! Booking repository implementation.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, warn};

use venue_core::error::{AppError, ErrorKind};
use venue_core::result::AppResult;
use venue_core::types::pagination::{PageRequest, PageResponse};
use venue_core::types::{BookingId, SpaceId};
use venue_entity::booking::{Booking, BookingStats, BookingStatus, has_capacity, overlapping_seats};

use crate::store::{BookingFilter, BookingStore};

const FILTER: &str = "WHERE ($1::uuid IS NULL OR user_id = $1) \
     AND ($2::uuid IS NULL OR space_id = $2) \
     AND ($3::booking_status IS NULL OR status = $3) \
     AND ($4::date IS NULL OR date = $4)";

/// PostgreSQL-backed [`BookingStore`].
#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    /// Create a new booking repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Advisory lock key for one (space, date) slot.
fn slot_key(space_id: SpaceId, date: NaiveDate) -> String {
    format!("booking:{space_id}:{date}")
}

#[async_trait]
impl BookingStore for BookingRepository {
    async fn find_active_on_date(
        &self,
        space_id: SpaceId,
        date: NaiveDate,
    ) -> AppResult<Vec<Booking>> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE space_id = $1 AND date = $2 \
             AND status IN ('pending', 'confirmed')",
        )
        .bind(space_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load bookings", e))
    }

    async fn insert_within_capacity(&self, booking: &Booking, capacity: i32) -> AppResult<Booking> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        // Released on commit or rollback.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(slot_key(booking.space_id, booking.date))
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to lock booking slot", e)
            })?;

        let active = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE space_id = $1 AND date = $2 \
             AND status IN ('pending', 'confirmed')",
        )
        .bind(booking.space_id)
        .bind(booking.date)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load bookings", e))?;

        let booked = overlapping_seats(&active, &booking.window());
        if !has_capacity(capacity, booked, booking.seats) {
            warn!(
                space_id = %booking.space_id,
                date = %booking.date,
                booked,
                requested = booking.seats,
                "Capacity re-check failed inside slot lock"
            );
            return Err(AppError::capacity_exceeded(
                "Space is not available for the selected time and seats",
            ));
        }

        let inserted = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, space_id, user_id, date, start_time, end_time, seats, amount, \
             status, promo_code, order_id, notes, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) RETURNING *",
        )
        .bind(booking.id)
        .bind(booking.space_id)
        .bind(booking.user_id)
        .bind(booking.date)
        .bind(booking.start_time)
        .bind(booking.end_time)
        .bind(booking.seats)
        .bind(booking.amount)
        .bind(booking.status)
        .bind(&booking.promo_code)
        .bind(&booking.order_id)
        .bind(&booking.notes)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create booking", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit booking", e)
        })?;

        debug!(booking_id = %inserted.id, "Booking row inserted");
        Ok(inserted)
    }

    async fn find_by_id(&self, id: BookingId) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find booking", e))
    }

    async fn list(
        &self,
        filter: &BookingFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Booking>> {
        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM bookings {FILTER}"))
            .bind(filter.user_id)
            .bind(filter.space_id)
            .bind(filter.status)
            .bind(filter.date)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count bookings", e)
            })?;

        let bookings = sqlx::query_as::<_, Booking>(&format!(
            "SELECT * FROM bookings {FILTER} ORDER BY created_at DESC LIMIT $5 OFFSET $6"
        ))
        .bind(filter.user_id)
        .bind(filter.space_id)
        .bind(filter.status)
        .bind(filter.date)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list bookings", e))?;

        Ok(PageResponse::new(
            bookings,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn update(&self, booking: &Booking, expected: BookingStatus) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = $2, order_id = $3, payment_id = $4, payment_signature = $5, \
             cancellation_reason = $6, cancelled_at = $7, refund_amount = $8, notes = $9, updated_at = $10 \
             WHERE id = $1 AND status = $11 RETURNING *",
        )
        .bind(booking.id)
        .bind(booking.status)
        .bind(&booking.order_id)
        .bind(&booking.payment_id)
        .bind(&booking.payment_signature)
        .bind(&booking.cancellation_reason)
        .bind(booking.cancelled_at)
        .bind(booking.refund_amount)
        .bind(&booking.notes)
        .bind(booking.updated_at)
        .bind(expected)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update booking", e))?
        .ok_or_else(|| {
            AppError::invalid_state(format!(
                "Booking {} is no longer {expected}",
                booking.id
            ))
        })
    }

    async fn stats(&self, filter: &BookingFilter) -> AppResult<BookingStats> {
        let (total, pending, confirmed, cancelled, revenue): (i64, i64, i64, i64, Option<Decimal>) =
            sqlx::query_as(&format!(
                "SELECT COUNT(*), \
                 COUNT(*) FILTER (WHERE status = 'pending'), \
                 COUNT(*) FILTER (WHERE status = 'confirmed'), \
                 COUNT(*) FILTER (WHERE status = 'cancelled'), \
                 SUM(amount) FILTER (WHERE status = 'confirmed') \
                 FROM bookings {FILTER}"
            ))
            .bind(filter.user_id)
            .bind(filter.space_id)
            .bind(filter.status)
            .bind(filter.date)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to compute booking stats", e)
            })?;

        Ok(BookingStats {
            total,
            pending,
            confirmed,
            cancelled,
            total_revenue: revenue.unwrap_or(Decimal::ZERO),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_key_is_per_space_and_date() {
        let space = SpaceId::new();
        let a = slot_key(space, NaiveDate::from_ymd_opt(2025, 6, 10).unwrap());
        let b = slot_key(space, NaiveDate::from_ymd_opt(2025, 6, 11).unwrap());
        assert_ne!(a, b);
        assert!(a.ends_with("2025-06-10"));
    }
}
