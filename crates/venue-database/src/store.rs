//! Store traits consumed by the booking and space services.
//!
//! Both traits have a PostgreSQL implementation in [`crate::repositories`]
//! and an in-memory one in [`crate::memory`].

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use venue_core::result::AppResult;
use venue_core::types::pagination::{PageRequest, PageResponse};
use venue_core::types::{BookingId, SpaceId, UserId};
use venue_entity::booking::{Booking, BookingStats, BookingStatus};
use venue_entity::space::{Space, SpaceType};

/// Filters for listing spaces.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpaceFilter {
    pub space_type: Option<SpaceType>,
    pub owner_id: Option<UserId>,
    /// Also return deactivated spaces.
    pub include_inactive: bool,
}

impl SpaceFilter {
    /// Whether `space` passes the filter.
    pub fn matches(&self, space: &Space) -> bool {
        self.space_type.is_none_or(|t| space.space_type == t)
            && self.owner_id.is_none_or(|o| space.owner_id == o)
            && (self.include_inactive || space.is_active)
    }
}

/// Filters for listing bookings and computing stats.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingFilter {
    pub user_id: Option<UserId>,
    pub space_id: Option<SpaceId>,
    pub status: Option<BookingStatus>,
    pub date: Option<NaiveDate>,
}

impl BookingFilter {
    /// Bookings made by one user.
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            ..Self::default()
        }
    }

    /// Whether `booking` passes the filter.
    pub fn matches(&self, booking: &Booking) -> bool {
        self.user_id.is_none_or(|u| booking.user_id == u)
            && self.space_id.is_none_or(|s| booking.space_id == s)
            && self.status.is_none_or(|s| booking.status == s)
            && self.date.is_none_or(|d| booking.date == d)
    }
}

/// Persistence for spaces and their pricing configuration.
#[async_trait]
pub trait SpaceStore: Send + Sync + std::fmt::Debug {
    async fn find_by_id(&self, id: SpaceId) -> AppResult<Option<Space>>;

    async fn create(&self, space: &Space) -> AppResult<Space>;

    /// Persist changed fields. Promo `current_uses` already stored are kept.
    async fn update(&self, space: &Space) -> AppResult<Space>;

    async fn delete(&self, id: SpaceId) -> AppResult<()>;

    /// Newest first.
    async fn list(&self, filter: &SpaceFilter, page: &PageRequest)
    -> AppResult<PageResponse<Space>>;

    /// Atomically increment a promo's `current_uses` if it is below
    /// `max_uses` and `now` is inside its validity window.
    ///
    /// Returns `false` when the promo is missing, expired, or exhausted.
    async fn redeem_promo(&self, space_id: SpaceId, code: &str, now: DateTime<Utc>)
    -> AppResult<bool>;
}

/// Persistence for bookings.
#[async_trait]
pub trait BookingStore: Send + Sync + std::fmt::Debug {
    /// Pending and confirmed bookings of a space on one calendar date.
    async fn find_active_on_date(&self, space_id: SpaceId, date: NaiveDate)
    -> AppResult<Vec<Booking>>;

    /// Insert `booking` only if its seats still fit in `capacity` next to the
    /// active bookings overlapping it, checked and inserted atomically.
    ///
    /// Fails with `CapacityExceeded` when they do not.
    async fn insert_within_capacity(&self, booking: &Booking, capacity: i32) -> AppResult<Booking>;

    async fn find_by_id(&self, id: BookingId) -> AppResult<Option<Booking>>;

    /// Newest first.
    async fn list(
        &self,
        filter: &BookingFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Booking>>;

    /// Persist status, payment, and cancellation fields, but only while the
    /// stored status is still `expected`.
    ///
    /// Fails with `InvalidState` when another request changed the status
    /// first.
    async fn update(&self, booking: &Booking, expected: BookingStatus) -> AppResult<Booking>;

    async fn stats(&self, filter: &BookingFilter) -> AppResult<BookingStats>;
}
