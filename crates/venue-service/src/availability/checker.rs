//! Availability checker.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use venue_core::error::AppError;
use venue_core::result::AppResult;
use venue_core::types::SpaceId;
use venue_database::store::{BookingStore, SpaceStore};
use venue_entity::booking::{TimeWindow, has_capacity, overlapping_seats};
use venue_entity::space::Space;

/// Result of an availability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub available: bool,
    pub capacity: i32,
    /// Seats held by active bookings overlapping the window.
    pub booked_seats: i64,
    pub remaining_seats: i64,
}

/// Decides whether a seat request fits a space's capacity.
#[derive(Debug, Clone)]
pub struct AvailabilityChecker {
    spaces: Arc<dyn SpaceStore>,
    bookings: Arc<dyn BookingStore>,
}

impl AvailabilityChecker {
    pub fn new(spaces: Arc<dyn SpaceStore>, bookings: Arc<dyn BookingStore>) -> Self {
        Self { spaces, bookings }
    }

    /// Whether `seats` more fit in `window` on the space.
    ///
    /// Bool-only form of [`Self::check_space`] for callers that need no seat
    /// counts. Fails with `NotFound` when the space does not exist.
    pub async fn is_available(
        &self,
        space_id: SpaceId,
        window: &TimeWindow,
        seats: i32,
    ) -> AppResult<bool> {
        Ok(self.check_space(space_id, window, seats).await?.available)
    }

    /// Load the space and check the request against it.
    ///
    /// Fails with `NotFound` when the space does not exist.
    pub async fn check_space(
        &self,
        space_id: SpaceId,
        window: &TimeWindow,
        seats: i32,
    ) -> AppResult<Availability> {
        let space = self
            .spaces
            .find_by_id(space_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Space {space_id} not found")))?;
        self.check(&space, window, seats).await
    }

    /// Detailed check against an already loaded space.
    pub async fn check(
        &self,
        space: &Space,
        window: &TimeWindow,
        seats: i32,
    ) -> AppResult<Availability> {
        if seats < 1 {
            return Err(AppError::validation("At least one seat must be requested"));
        }

        let active = self
            .bookings
            .find_active_on_date(space.id, window.date)
            .await?;
        let booked_seats = overlapping_seats(&active, window);
        let available = has_capacity(space.capacity, booked_seats, seats);

        debug!(
            space_id = %space.id,
            date = %window.date,
            booked_seats,
            requested = seats,
            capacity = space.capacity,
            available,
            "Availability checked"
        );

        Ok(Availability {
            available,
            capacity: space.capacity,
            booked_seats,
            remaining_seats: (i64::from(space.capacity) - booked_seats).max(0),
        })
    }
}
