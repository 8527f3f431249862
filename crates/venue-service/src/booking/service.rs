//! Booking lifecycle service.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use venue_core::config::BookingConfig;
use venue_core::error::{AppError, ErrorKind};
use venue_core::result::AppResult;
use venue_core::types::pagination::{PageRequest, PageResponse};
use venue_core::types::{BookingId, SpaceId};
use venue_database::store::{BookingFilter, BookingStore, SpaceStore};
use venue_entity::booking::{Booking, BookingStats, BookingStatus, CreateBooking, TimeWindow};
use venue_entity::space::Space;

use crate::availability::{Availability, AvailabilityChecker, SlotLocks};
use crate::context::RequestContext;
use crate::payment::PaymentVerifier;
use crate::pricing::{billable_hours, calculate_price};

/// Message shown for every capacity rejection.
const NOT_AVAILABLE: &str = "Space is not available for the selected time and seats";

/// Request to book seats in a space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub space_id: SpaceId,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// `HH:MM`.
    pub start_time: String,
    /// `HH:MM`.
    pub end_time: String,
    pub seats: i32,
    pub promo_code: Option<String>,
    /// Gateway order created by the client before booking.
    pub order_id: Option<String>,
    pub notes: Option<String>,
}

/// Payment callback data proving a booking was paid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfirmation {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

/// Orchestrates availability, pricing, and persistence of bookings.
#[derive(Debug, Clone)]
pub struct BookingService {
    spaces: Arc<dyn SpaceStore>,
    bookings: Arc<dyn BookingStore>,
    checker: AvailabilityChecker,
    locks: Arc<SlotLocks>,
    verifier: Arc<dyn PaymentVerifier>,
    config: BookingConfig,
}

impl BookingService {
    /// Creates a new booking service.
    pub fn new(
        spaces: Arc<dyn SpaceStore>,
        bookings: Arc<dyn BookingStore>,
        locks: Arc<SlotLocks>,
        verifier: Arc<dyn PaymentVerifier>,
        config: BookingConfig,
    ) -> Self {
        let checker = AvailabilityChecker::new(Arc::clone(&spaces), Arc::clone(&bookings));
        Self {
            spaces,
            bookings,
            checker,
            locks,
            verifier,
            config,
        }
    }

    /// Check whether `seats` fit in the given window of a space.
    pub async fn check_availability(
        &self,
        space_id: SpaceId,
        date: &str,
        start_time: &str,
        end_time: &str,
        seats: i32,
    ) -> AppResult<Availability> {
        let window = TimeWindow::parse(date, start_time, end_time)?;
        self.checker.check_space(space_id, &window, seats).await
    }

    /// Create a pending booking at the computed price.
    pub async fn create(&self, ctx: &RequestContext, req: CreateBookingRequest) -> AppResult<Booking> {
        let window = TimeWindow::parse(&req.date, &req.start_time, &req.end_time)?;
        if req.seats < 1 {
            return Err(AppError::validation("At least one seat must be requested"));
        }

        let space = self.load_space(req.space_id).await?;
        if !space.is_active {
            return Err(AppError::validation("Space is not accepting bookings"));
        }
        if self.config.enforce_policy {
            space
                .policy
                .check_duration(billable_hours(window.start_at(), window.end_at()))?;
            space
                .policy
                .check_lead_time(ctx.request_time, window.start_at().and_utc())?;
        }

        let _slot = if self.config.slot_locks {
            Some(self.locks.acquire(space.id, window.date).await)
        } else {
            None
        };

        let availability = self.checker.check(&space, &window, req.seats).await?;
        if !availability.available {
            warn!(
                space_id = %space.id,
                date = %window.date,
                requested = req.seats,
                booked = availability.booked_seats,
                capacity = space.capacity,
                "Booking rejected: capacity exceeded"
            );
            return Err(AppError::capacity_exceeded(NOT_AVAILABLE));
        }

        let promo_code = req
            .promo_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());
        let price = calculate_price(
            &space.pricing,
            window.start_at(),
            window.end_at(),
            promo_code,
            ctx.request_time,
        );
        let redeemed = promo_code.filter(|_| price.promo_discount > Decimal::ZERO);

        let booking = CreateBooking {
            space_id: space.id,
            user_id: ctx.user_id,
            window,
            seats: req.seats,
            amount: price.final_price,
            promo_code: redeemed.map(str::to_string),
            order_id: req.order_id,
            notes: req.notes,
        }
        .into_booking(ctx.request_time);

        let booking = self
            .bookings
            .insert_within_capacity(&booking, space.capacity)
            .await
            .map_err(|e| {
                if e.is(ErrorKind::CapacityExceeded) {
                    AppError::capacity_exceeded(NOT_AVAILABLE)
                } else {
                    e
                }
            })?;

        // The booking is already stored, so a failed redemption must not fail
        // the request.
        if let Some(code) = redeemed {
            match self
                .spaces
                .redeem_promo(space.id, code, ctx.request_time)
                .await
            {
                Ok(true) => {}
                Ok(false) => warn!(
                    booking_id = %booking.id,
                    promo_code = %code,
                    "Promo code ran out before redemption was recorded"
                ),
                Err(e) => warn!(
                    booking_id = %booking.id,
                    promo_code = %code,
                    error = %e,
                    "Failed to record promo redemption"
                ),
            }
        }

        info!(
            user_id = %ctx.user_id,
            booking_id = %booking.id,
            space_id = %space.id,
            date = %booking.date,
            seats = booking.seats,
            amount = %booking.amount,
            "Booking created"
        );

        Ok(booking)
    }

    /// Get a booking visible to the caller.
    pub async fn get(&self, ctx: &RequestContext, id: BookingId) -> AppResult<Booking> {
        let booking = self.load_booking(id).await?;
        if booking.user_id == ctx.user_id || ctx.is_admin() {
            return Ok(booking);
        }
        let space = self.load_space(booking.space_id).await?;
        if ctx.can_manage(&space) {
            Ok(booking)
        } else {
            Err(AppError::forbidden("You cannot view this booking"))
        }
    }

    /// List bookings. Admins see everything, owners may filter by one of their
    /// spaces, and everyone else sees only their own bookings.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        filter: BookingFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<Booking>> {
        let filter = self.scope_filter(ctx, filter).await?;
        self.bookings.list(&filter, &page).await
    }

    /// List the caller's own bookings.
    pub async fn list_mine(
        &self,
        ctx: &RequestContext,
        filter: BookingFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<Booking>> {
        let filter = BookingFilter {
            user_id: Some(ctx.user_id),
            ..filter
        };
        self.bookings.list(&filter, &page).await
    }

    /// Booking counters within the caller's scope.
    pub async fn stats(&self, ctx: &RequestContext, filter: BookingFilter) -> AppResult<BookingStats> {
        let filter = self.scope_filter(ctx, filter).await?;
        self.bookings.stats(&filter).await
    }

    /// Confirm a pending booking with a verified gateway payment.
    pub async fn confirm_payment(
        &self,
        ctx: &RequestContext,
        id: BookingId,
        payment: PaymentConfirmation,
    ) -> AppResult<Booking> {
        let mut booking = self.get(ctx, id).await?;

        if let Some(expected) = booking.order_id.as_deref() {
            if expected != payment.order_id {
                return Err(AppError::validation("Payment order does not match this booking"));
            }
        }
        if !self
            .verifier
            .verify(&payment.order_id, &payment.payment_id, &payment.signature)
        {
            warn!(booking_id = %id, order_id = %payment.order_id, "Payment signature rejected");
            return Err(AppError::validation("Invalid payment signature"));
        }

        let previous = booking.status;
        booking.confirm(
            Some(payment.order_id),
            Some(payment.payment_id),
            Some(payment.signature),
            ctx.request_time,
        )?;
        let booking = self.bookings.update(&booking, previous).await?;

        info!(user_id = %ctx.user_id, booking_id = %id, "Booking confirmed by payment");
        Ok(booking)
    }

    /// Owner or admin status change.
    pub async fn update_status(
        &self,
        ctx: &RequestContext,
        id: BookingId,
        status: BookingStatus,
        reason: Option<String>,
    ) -> AppResult<Booking> {
        let mut booking = self.load_booking(id).await?;
        let space = self.load_space(booking.space_id).await?;
        if !ctx.can_manage(&space) {
            return Err(AppError::forbidden(
                "Only the space owner or an admin can change booking status",
            ));
        }

        let previous = booking.status;
        match status {
            BookingStatus::Confirmed => booking.confirm(None, None, None, ctx.request_time)?,
            BookingStatus::Cancelled => booking.cancel(reason, ctx.request_time)?,
            BookingStatus::Pending => {
                return Err(AppError::invalid_state("Bookings cannot return to pending"));
            }
        }
        let booking = self.bookings.update(&booking, previous).await?;

        info!(
            user_id = %ctx.user_id,
            booking_id = %id,
            status = %booking.status,
            "Booking status updated"
        );
        Ok(booking)
    }

    /// Cancel a booking. Its own user is held to the space's cancellation
    /// policy; the space owner and admins are not.
    pub async fn cancel(
        &self,
        ctx: &RequestContext,
        id: BookingId,
        reason: Option<String>,
    ) -> AppResult<Booking> {
        let mut booking = self.load_booking(id).await?;
        let space = self.load_space(booking.space_id).await?;
        let manages = ctx.can_manage(&space);

        if booking.user_id != ctx.user_id && !manages {
            return Err(AppError::forbidden("You cannot cancel this booking"));
        }
        if !manages
            && booking.status.is_active()
            && !space
                .policy
                .cancellation_policy
                .allows(ctx.request_time, booking.starts_at())
        {
            return Err(AppError::forbidden(format!(
                "Cancellation policy '{}' no longer allows cancelling this booking",
                space.policy.cancellation_policy
            )));
        }

        let previous = booking.status;
        booking.cancel(reason, ctx.request_time)?;
        let booking = self.bookings.update(&booking, previous).await?;

        info!(
            user_id = %ctx.user_id,
            booking_id = %id,
            refund = ?booking.refund_amount,
            "Booking cancelled"
        );
        Ok(booking)
    }

    async fn scope_filter(&self, ctx: &RequestContext, filter: BookingFilter) -> AppResult<BookingFilter> {
        if ctx.is_admin() {
            return Ok(filter);
        }
        if let Some(space_id) = filter.space_id {
            let space = self.load_space(space_id).await?;
            if ctx.can_manage(&space) {
                return Ok(filter);
            }
        }
        Ok(BookingFilter {
            user_id: Some(ctx.user_id),
            ..filter
        })
    }

    async fn load_space(&self, id: SpaceId) -> AppResult<Space> {
        self.spaces
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Space {id} not found")))
    }

    async fn load_booking(&self, id: BookingId) -> AppResult<Booking> {
        self.bookings
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Booking {id} not found")))
    }
}
