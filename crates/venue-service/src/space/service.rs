//! Space listing and pricing configuration service.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use venue_core::error::AppError;
use venue_core::result::AppResult;
use venue_core::types::SpaceId;
use venue_core::types::pagination::{PageRequest, PageResponse};
use venue_database::store::{SpaceFilter, SpaceStore};
use venue_entity::booking::TimeWindow;
use venue_entity::pricing::{PriceBreakdown, PricingConfig};
use venue_entity::space::{BookingPolicy, CreateSpace, Space, SpaceType, UpdateSpace};

use crate::context::RequestContext;
use crate::pricing::calculate_price;

/// Request to list a new space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSpaceRequest {
    pub name: String,
    pub description: String,
    pub address: String,
    pub space_type: SpaceType,
    pub capacity: i32,
    pub pricing: PricingConfig,
    pub policy: BookingPolicy,
}

/// Price preview request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub promo_code: Option<String>,
}

/// Manages spaces and their pricing rules.
#[derive(Debug, Clone)]
pub struct SpaceService {
    spaces: Arc<dyn SpaceStore>,
}

impl SpaceService {
    /// Creates a new space service.
    pub fn new(spaces: Arc<dyn SpaceStore>) -> Self {
        Self { spaces }
    }

    /// List a new space owned by the caller.
    pub async fn create(&self, ctx: &RequestContext, req: CreateSpaceRequest) -> AppResult<Space> {
        if !ctx.role.can_manage_spaces() {
            return Err(AppError::forbidden("Only brand owners and admins can list spaces"));
        }

        let input = CreateSpace {
            owner_id: ctx.user_id,
            name: req.name,
            description: req.description,
            address: req.address,
            space_type: req.space_type,
            capacity: req.capacity,
            pricing: req.pricing,
            policy: req.policy,
        };
        input.validate()?;

        let space = self.spaces.create(&input.into_space(ctx.request_time)).await?;
        info!(
            user_id = %ctx.user_id,
            space_id = %space.id,
            space_type = %space.space_type,
            capacity = space.capacity,
            "Space created"
        );
        Ok(space)
    }

    /// Apply a validated partial update. Stored promo redemption counts are kept.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: SpaceId,
        changes: UpdateSpace,
    ) -> AppResult<Space> {
        let current = self.get(id).await?;
        if !ctx.can_manage(&current) {
            return Err(AppError::forbidden("Only the owner or an admin can edit this space"));
        }

        let mut updated = current;
        changes.apply(&mut updated, ctx.request_time)?;

        let space = self.spaces.update(&updated).await?;
        info!(user_id = %ctx.user_id, space_id = %id, "Space updated");
        Ok(space)
    }

    pub async fn get(&self, id: SpaceId) -> AppResult<Space> {
        self.spaces
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Space {id} not found")))
    }

    /// Public listing; inactive spaces are only listed for admins.
    pub async fn list(
        &self,
        ctx: Option<&RequestContext>,
        filter: SpaceFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<Space>> {
        let include_inactive = filter.include_inactive && ctx.is_some_and(RequestContext::is_admin);
        let filter = SpaceFilter {
            include_inactive,
            ..filter
        };
        self.spaces.list(&filter, &page).await
    }

    /// Spaces owned by the caller, active or not.
    pub async fn list_mine(
        &self,
        ctx: &RequestContext,
        space_type: Option<SpaceType>,
        page: PageRequest,
    ) -> AppResult<PageResponse<Space>> {
        let filter = SpaceFilter {
            space_type,
            owner_id: Some(ctx.user_id),
            include_inactive: true,
        };
        self.spaces.list(&filter, &page).await
    }

    /// Owners deactivate their space; admins delete it outright.
    ///
    /// Returns the deactivated space, or `None` when it was deleted.
    pub async fn delete(&self, ctx: &RequestContext, id: SpaceId) -> AppResult<Option<Space>> {
        let mut space = self.get(id).await?;

        if ctx.is_admin() {
            self.spaces.delete(id).await?;
            info!(user_id = %ctx.user_id, space_id = %id, "Space deleted");
            return Ok(None);
        }
        if !space.is_owned_by(ctx.user_id) {
            return Err(AppError::forbidden("Only the owner or an admin can remove this space"));
        }

        space.is_active = false;
        space.updated_at = ctx.request_time;
        let space = self.spaces.update(&space).await?;
        info!(user_id = %ctx.user_id, space_id = %id, "Space deactivated");
        Ok(Some(space))
    }

    /// Price preview for a window, without redeeming anything.
    pub async fn quote(
        &self,
        id: SpaceId,
        req: &QuoteRequest,
        now: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<PriceBreakdown> {
        let window = TimeWindow::parse(&req.date, &req.start_time, &req.end_time)?;
        let space = self.get(id).await?;
        Ok(calculate_price(
            &space.pricing,
            window.start_at(),
            window.end_at(),
            req.promo_code.as_deref(),
            now,
        ))
    }
}
