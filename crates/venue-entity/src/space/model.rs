//! Space entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use venue_core::error::AppError;
use venue_core::result::AppResult;
use venue_core::types::{SpaceId, UserId};

use super::policy::BookingPolicy;
use crate::pricing::PricingConfig;

/// Kind of space being listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "space_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SpaceType {
    /// A venue hosting an event.
    Event,
    /// A hosted experience.
    Experience,
}

impl SpaceType {
    /// Return the type as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Experience => "experience",
        }
    }
}

impl fmt::Display for SpaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SpaceType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "event" => Ok(Self::Event),
            "experience" => Ok(Self::Experience),
            _ => Err(AppError::validation(format!(
                "Invalid space type: '{s}'. Expected one of: event, experience"
            ))),
        }
    }
}

/// A bookable space listed by a brand owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Space {
    pub id: SpaceId,
    /// The brand owner who listed the space.
    pub owner_id: UserId,
    pub name: String,
    pub description: String,
    pub address: String,
    pub space_type: SpaceType,
    /// Maximum concurrent seats across overlapping bookings.
    pub capacity: i32,
    /// Inactive spaces stay readable but take no new bookings.
    pub is_active: bool,
    pub pricing: PricingConfig,
    pub policy: BookingPolicy,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Space {
    /// Whether `user_id` listed this space.
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }
}

/// Data required to create a new space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSpace {
    pub owner_id: UserId,
    pub name: String,
    pub description: String,
    pub address: String,
    pub space_type: SpaceType,
    pub capacity: i32,
    pub pricing: PricingConfig,
    pub policy: BookingPolicy,
}

impl CreateSpace {
    /// Validate everything a new listing must satisfy.
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Space name is required"));
        }
        if self.capacity <= 0 {
            return Err(AppError::validation("Capacity must be positive"));
        }
        self.pricing.validate()?;
        self.policy.validate()
    }

    /// Materialize the space record.
    pub fn into_space(self, now: DateTime<Utc>) -> Space {
        Space {
            id: SpaceId::new(),
            owner_id: self.owner_id,
            name: self.name,
            description: self.description,
            address: self.address,
            space_type: self.space_type,
            capacity: self.capacity,
            is_active: true,
            pricing: self.pricing,
            policy: self.policy,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of a space; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSpace {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub space_type: Option<SpaceType>,
    pub capacity: Option<i32>,
    pub is_active: Option<bool>,
    pub pricing: Option<PricingConfig>,
    pub policy: Option<BookingPolicy>,
}

impl UpdateSpace {
    /// Apply the changes to `space`, validating the result.
    pub fn apply(self, space: &mut Space, now: DateTime<Utc>) -> AppResult<()> {
        if let Some(name) = self.name {
            if name.trim().is_empty() {
                return Err(AppError::validation("Space name is required"));
            }
            space.name = name;
        }
        if let Some(description) = self.description {
            space.description = description;
        }
        if let Some(address) = self.address {
            space.address = address;
        }
        if let Some(space_type) = self.space_type {
            space.space_type = space_type;
        }
        if let Some(capacity) = self.capacity {
            if capacity < 0 {
                return Err(AppError::validation("Capacity must not be negative"));
            }
            space.capacity = capacity;
        }
        if let Some(is_active) = self.is_active {
            space.is_active = is_active;
        }
        if let Some(pricing) = self.pricing {
            pricing.validate()?;
            space.pricing = pricing;
        }
        if let Some(policy) = self.policy {
            policy.validate()?;
            space.policy = policy;
        }
        space.updated_at = now;
        Ok(())
    }
}
