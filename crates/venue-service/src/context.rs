//! Request context carrying the authenticated caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use venue_core::types::UserId;
use venue_entity::space::Space;
use venue_entity::user::UserRole;

/// Context for the current authenticated request.
///
/// Built by the HTTP extractor and passed into service methods so every
/// operation knows who is acting and when.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    pub user_id: UserId,
    pub role: UserRole,
    /// When the request was received; used as "now" by the services.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    pub fn new(user_id: UserId, role: UserRole) -> Self {
        Self {
            user_id,
            role,
            request_time: Utc::now(),
        }
    }

    /// Same caller with a fixed clock.
    pub fn at(mut self, request_time: DateTime<Utc>) -> Self {
        self.request_time = request_time;
        self
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Whether the caller may configure or manage bookings of `space`.
    pub fn can_manage(&self, space: &Space) -> bool {
        self.is_admin() || space.is_owned_by(self.user_id)
    }
}
