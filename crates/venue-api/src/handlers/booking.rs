//! Booking, availability, and payment handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use venue_core::types::{BookingId, PageResponse, SpaceId};
use venue_entity::booking::{Booking, BookingStats};
use venue_service::Availability;

use crate::dto::request::{
    AvailabilityQuery, BookingListQuery, CancelBookingBody, CreateBookingBody, PaymentBody,
    UpdateStatusBody, validated,
};
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/bookings/availability/{space_id}
pub async fn check_availability(
    State(state): State<AppState>,
    Path(space_id): Path<SpaceId>,
    Query(query): Query<AvailabilityQuery>,
) -> ApiResult<Json<ApiResponse<Availability>>> {
    let query = validated(query)?;
    let availability = state
        .booking_service
        .check_availability(
            space_id,
            &query.date,
            &query.start_time,
            &query.end_time,
            query.seats,
        )
        .await?;
    Ok(Json(ApiResponse::ok(availability)))
}

/// POST /api/bookings
pub async fn create_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateBookingBody>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Booking>>)> {
    let body = validated(body)?;
    let booking = state.booking_service.create(&auth, body.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(booking))))
}

/// GET /api/bookings
pub async fn list_bookings(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<BookingListQuery>,
) -> ApiResult<Json<ApiResponse<PageResponse<Booking>>>> {
    let page = state
        .booking_service
        .list(&auth, query.filter()?, query.pagination().into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/bookings/mine
pub async fn list_my_bookings(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<BookingListQuery>,
) -> ApiResult<Json<ApiResponse<PageResponse<Booking>>>> {
    let page = state
        .booking_service
        .list_mine(&auth, query.filter()?, query.pagination().into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/bookings/stats
pub async fn booking_stats(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<BookingListQuery>,
) -> ApiResult<Json<ApiResponse<BookingStats>>> {
    let stats = state.booking_service.stats(&auth, query.filter()?).await?;
    Ok(Json(ApiResponse::ok(stats)))
}

/// GET /api/bookings/{id}
pub async fn get_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<BookingId>,
) -> ApiResult<Json<ApiResponse<Booking>>> {
    let booking = state.booking_service.get(&auth, id).await?;
    Ok(Json(ApiResponse::ok(booking)))
}

/// PUT /api/bookings/{id}/cancel
pub async fn cancel_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<BookingId>,
    body: Option<Json<CancelBookingBody>>,
) -> ApiResult<Json<ApiResponse<Booking>>> {
    let body = validated(body.map(|Json(b)| b).unwrap_or_default())?;
    let booking = state.booking_service.cancel(&auth, id, body.reason).await?;
    Ok(Json(ApiResponse::ok(booking)))
}

/// PUT /api/bookings/{id}/status
pub async fn update_booking_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<BookingId>,
    Json(body): Json<UpdateStatusBody>,
) -> ApiResult<Json<ApiResponse<Booking>>> {
    let body = validated(body)?;
    let booking = state
        .booking_service
        .update_status(&auth, id, body.status, body.reason)
        .await?;
    Ok(Json(ApiResponse::ok(booking)))
}

/// POST /api/bookings/{id}/payment
pub async fn confirm_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<BookingId>,
    Json(body): Json<PaymentBody>,
) -> ApiResult<Json<ApiResponse<Booking>>> {
    let body = validated(body)?;
    let booking = state
        .booking_service
        .confirm_payment(&auth, id, body.into())
        .await?;
    Ok(Json(ApiResponse::ok(booking)))
}
