//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use venue_core::error::AppError;
use venue_core::types::SpaceId;
use venue_entity::booking::{BookingStatus, parse_date};
use venue_entity::pricing::PricingConfig;
use venue_entity::space::{BookingPolicy, SpaceType, UpdateSpace};
use venue_database::{BookingFilter, SpaceFilter};
use venue_service::{CreateBookingRequest, CreateSpaceRequest, PaymentConfirmation, QuoteRequest};

use crate::extractors::PaginationParams;

/// Run `validator` rules and map failures to a validation error.
pub fn validated<T: Validate>(body: T) -> Result<T, AppError> {
    body.validate()
        .map_err(|e| AppError::validation(format!("Invalid request: {e}")))?;
    Ok(body)
}

/// Create space request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSpaceBody {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 5000))]
    pub description: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub address: String,
    pub space_type: SpaceType,
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: i32,
    pub pricing: PricingConfig,
    #[serde(default)]
    pub policy: BookingPolicy,
}

impl From<CreateSpaceBody> for CreateSpaceRequest {
    fn from(body: CreateSpaceBody) -> Self {
        Self {
            name: body.name,
            description: body.description,
            address: body.address,
            space_type: body.space_type,
            capacity: body.capacity,
            pricing: body.pricing,
            policy: body.policy,
        }
    }
}

/// Update space request body; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSpaceBody {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    pub space_type: Option<SpaceType>,
    #[validate(range(min = 0))]
    pub capacity: Option<i32>,
    pub is_active: Option<bool>,
    pub pricing: Option<PricingConfig>,
    pub policy: Option<BookingPolicy>,
}

impl From<UpdateSpaceBody> for UpdateSpace {
    fn from(body: UpdateSpaceBody) -> Self {
        Self {
            name: body.name,
            description: body.description,
            address: body.address,
            space_type: body.space_type,
            capacity: body.capacity,
            is_active: body.is_active,
            pricing: body.pricing,
            policy: body.policy,
        }
    }
}

/// Query parameters for the public space listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceListQuery {
    pub page: Option<u64>,
    #[serde(alias = "per_page", alias = "limit")]
    pub per_page: Option<u64>,
    #[serde(rename = "type")]
    pub space_type: Option<SpaceType>,
    /// Honoured for admins only.
    #[serde(default, alias = "include_inactive")]
    pub include_inactive: bool,
}

impl SpaceListQuery {
    pub fn filter(&self) -> SpaceFilter {
        SpaceFilter {
            space_type: self.space_type,
            owner_id: None,
            include_inactive: self.include_inactive,
        }
    }

    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }
}

/// Price preview request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuoteBody {
    #[validate(length(equal = 10, message = "Date must be YYYY-MM-DD"))]
    pub date: String,
    #[validate(length(min = 4, max = 5))]
    pub start_time: String,
    #[validate(length(min = 4, max = 5))]
    pub end_time: String,
    #[validate(length(max = 64))]
    pub promo_code: Option<String>,
}

impl From<QuoteBody> for QuoteRequest {
    fn from(body: QuoteBody) -> Self {
        Self {
            date: body.date,
            start_time: body.start_time,
            end_time: body.end_time,
            promo_code: body.promo_code,
        }
    }
}

/// Query parameters for an availability check.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AvailabilityQuery {
    #[validate(length(equal = 10, message = "Date must be YYYY-MM-DD"))]
    pub date: String,
    #[serde(alias = "startTime")]
    pub start_time: String,
    #[serde(alias = "endTime")]
    pub end_time: String,
    #[serde(default = "default_seats")]
    #[validate(range(min = 1, message = "At least one seat must be requested"))]
    pub seats: i32,
}

fn default_seats() -> i32 {
    1
}

/// Create booking request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingBody {
    pub space_id: SpaceId,
    #[validate(length(equal = 10, message = "Date must be YYYY-MM-DD"))]
    pub date: String,
    #[validate(length(min = 4, max = 5))]
    pub start_time: String,
    #[validate(length(min = 4, max = 5))]
    pub end_time: String,
    #[serde(default = "default_seats")]
    #[validate(range(min = 1, message = "At least one seat must be requested"))]
    pub seats: i32,
    #[validate(length(max = 64))]
    pub promo_code: Option<String>,
    #[validate(length(max = 128))]
    pub order_id: Option<String>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

impl From<CreateBookingBody> for CreateBookingRequest {
    fn from(body: CreateBookingBody) -> Self {
        Self {
            space_id: body.space_id,
            date: body.date,
            start_time: body.start_time,
            end_time: body.end_time,
            seats: body.seats,
            promo_code: body.promo_code,
            order_id: body.order_id,
            notes: body.notes,
        }
    }
}

/// Query parameters for booking listings and stats.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingListQuery {
    pub page: Option<u64>,
    #[serde(alias = "per_page", alias = "limit")]
    pub per_page: Option<u64>,
    pub status: Option<BookingStatus>,
    #[serde(alias = "space_id")]
    pub space_id: Option<SpaceId>,
    pub date: Option<String>,
}

impl BookingListQuery {
    pub fn filter(&self) -> Result<BookingFilter, AppError> {
        Ok(BookingFilter {
            user_id: None,
            space_id: self.space_id,
            status: self.status,
            date: self.date.as_deref().map(parse_date).transpose()?,
        })
    }

    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }
}

/// Cancel booking request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CancelBookingBody {
    #[validate(length(max = 1000))]
    pub reason: Option<String>,
}

/// Owner/admin status change request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateStatusBody {
    pub status: BookingStatus,
    #[validate(length(max = 1000))]
    pub reason: Option<String>,
}

/// Payment callback body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PaymentBody {
    #[validate(length(min = 1, max = 128))]
    pub order_id: String,
    #[validate(length(min = 1, max = 128))]
    pub payment_id: String,
    #[validate(length(min = 1, max = 256))]
    pub signature: String,
}

impl From<PaymentBody> for PaymentConfirmation {
    fn from(body: PaymentBody) -> Self {
        Self {
            order_id: body.order_id,
            payment_id: body.payment_id,
            signature: body.signature,
        }
    }
}
