//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles carried in access tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Platform administrator.
    Admin,
    /// Lists spaces and manages their bookings.
    BrandOwner,
    /// Browses and books spaces.
    #[serde(rename = "user")]
    Attendee,
}

impl UserRole {
    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Check if this role may list and configure spaces.
    pub fn can_manage_spaces(&self) -> bool {
        matches!(self, Self::Admin | Self::BrandOwner)
    }

    /// Return the role as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::BrandOwner => "brand_owner",
            Self::Attendee => "user",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = venue_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "brand_owner" => Ok(Self::BrandOwner),
            "user" => Ok(Self::Attendee),
            _ => Err(venue_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: admin, brand_owner, user"
            ))),
        }
    }
}
