//! Space repository implementation.
//!
//! Rule lists are stored as JSONB columns on `spaces`; promo codes live in
//! `space_promo_codes` so redemption can be a single conditional update.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tracing::debug;
use uuid::Uuid;

use venue_core::error::{AppError, ErrorKind};
use venue_core::result::AppResult;
use venue_core::types::pagination::{PageRequest, PageResponse};
use venue_core::types::{SpaceId, UserId};
use venue_entity::pricing::{PeakHourRule, PricingConfig, PromoCode, SpecialEvent, TimeBlock};
use venue_entity::space::{BookingPolicy, CancellationPolicy, Space, SpaceType};

use crate::store::{SpaceFilter, SpaceStore};

/// Flat `spaces` row.
#[derive(Debug, FromRow)]
struct SpaceRow {
    id: SpaceId,
    owner_id: UserId,
    name: String,
    description: String,
    address: String,
    space_type: SpaceType,
    capacity: i32,
    is_active: bool,
    is_free: bool,
    base_price: Decimal,
    day_rate: Decimal,
    peak_hours: Json<Vec<PeakHourRule>>,
    time_blocks: Json<Vec<TimeBlock>>,
    special_events: Json<Vec<SpecialEvent>>,
    min_booking_hours: i32,
    max_booking_hours: i32,
    advance_booking_days: i32,
    cancellation_policy: CancellationPolicy,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SpaceRow {
    fn into_space(self, promo_codes: Vec<PromoCode>) -> Space {
        Space {
            id: self.id,
            owner_id: self.owner_id,
            name: self.name,
            description: self.description,
            address: self.address,
            space_type: self.space_type,
            capacity: self.capacity,
            is_active: self.is_active,
            pricing: PricingConfig {
                is_free: self.is_free,
                base_price: self.base_price,
                day_rate: self.day_rate,
                peak_hours: self.peak_hours.0,
                time_blocks: self.time_blocks.0,
                promo_codes,
                special_events: self.special_events.0,
            },
            policy: BookingPolicy {
                min_booking_hours: self.min_booking_hours,
                max_booking_hours: self.max_booking_hours,
                advance_booking_days: self.advance_booking_days,
                cancellation_policy: self.cancellation_policy,
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// `space_promo_codes` row.
#[derive(Debug, FromRow)]
struct PromoRow {
    space_id: SpaceId,
    code: String,
    discount_percentage: Decimal,
    valid_from: DateTime<Utc>,
    valid_until: DateTime<Utc>,
    max_uses: i32,
    current_uses: i32,
}

impl From<PromoRow> for PromoCode {
    fn from(row: PromoRow) -> Self {
        Self {
            code: row.code,
            discount_percentage: row.discount_percentage,
            valid_from: row.valid_from,
            valid_until: row.valid_until,
            max_uses: row.max_uses,
            current_uses: row.current_uses,
        }
    }
}

fn db_err(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, message, e)
}

/// PostgreSQL-backed [`SpaceStore`].
#[derive(Debug, Clone)]
pub struct SpaceRepository {
    pool: PgPool,
}

impl SpaceRepository {
    /// Create a new space repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load promo codes for a set of spaces, grouped by space, in configured order.
    async fn promos_for(&self, ids: &[SpaceId]) -> AppResult<HashMap<SpaceId, Vec<PromoCode>>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let uuids: Vec<Uuid> = ids.iter().map(|id| id.into_uuid()).collect();

        let rows = sqlx::query_as::<_, PromoRow>(
            "SELECT space_id, code, discount_percentage, valid_from, valid_until, max_uses, current_uses \
             FROM space_promo_codes WHERE space_id = ANY($1) ORDER BY position ASC",
        )
        .bind(&uuids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to load promo codes"))?;

        let mut grouped: HashMap<SpaceId, Vec<PromoCode>> = HashMap::new();
        for row in rows {
            grouped.entry(row.space_id).or_default().push(row.into());
        }
        Ok(grouped)
    }

    /// Replace the promo set of a space, keeping stored redemption counts.
    async fn sync_promos(
        tx: &mut Transaction<'_, Postgres>,
        space_id: SpaceId,
        promos: &[PromoCode],
    ) -> AppResult<()> {
        let codes: Vec<String> = promos.iter().map(|p| p.code.clone()).collect();

        sqlx::query("DELETE FROM space_promo_codes WHERE space_id = $1 AND code <> ALL($2)")
            .bind(space_id)
            .bind(&codes)
            .execute(&mut **tx)
            .await
            .map_err(db_err("Failed to prune promo codes"))?;

        for (position, promo) in promos.iter().enumerate() {
            sqlx::query(
                "INSERT INTO space_promo_codes \
                 (space_id, code, position, discount_percentage, valid_from, valid_until, max_uses, current_uses) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
                 ON CONFLICT (space_id, code) DO UPDATE SET \
                 position = EXCLUDED.position, \
                 discount_percentage = EXCLUDED.discount_percentage, \
                 valid_from = EXCLUDED.valid_from, \
                 valid_until = EXCLUDED.valid_until, \
                 max_uses = EXCLUDED.max_uses",
            )
            .bind(space_id)
            .bind(&promo.code)
            .bind(position as i32)
            .bind(promo.discount_percentage)
            .bind(promo.valid_from)
            .bind(promo.valid_until)
            .bind(promo.max_uses)
            .bind(promo.current_uses)
            .execute(&mut **tx)
            .await
            .map_err(db_err("Failed to save promo code"))?;
        }
        Ok(())
    }

    async fn fetch(&self, id: SpaceId) -> AppResult<Space> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Space {id} not found")))
    }
}

#[async_trait]
impl SpaceStore for SpaceRepository {
    async fn find_by_id(&self, id: SpaceId) -> AppResult<Option<Space>> {
        let row = sqlx::query_as::<_, SpaceRow>("SELECT * FROM spaces WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find space"))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let promos = self.promos_for(&[id]).await?.remove(&id).unwrap_or_default();
        Ok(Some(row.into_space(promos)))
    }

    async fn create(&self, space: &Space) -> AppResult<Space> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        sqlx::query(
            "INSERT INTO spaces (id, owner_id, name, description, address, space_type, capacity, is_active, \
             is_free, base_price, day_rate, peak_hours, time_blocks, special_events, \
             min_booking_hours, max_booking_hours, advance_booking_days, cancellation_policy, \
             created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)",
        )
        .bind(space.id)
        .bind(space.owner_id)
        .bind(&space.name)
        .bind(&space.description)
        .bind(&space.address)
        .bind(space.space_type)
        .bind(space.capacity)
        .bind(space.is_active)
        .bind(space.pricing.is_free)
        .bind(space.pricing.base_price)
        .bind(space.pricing.day_rate)
        .bind(Json(&space.pricing.peak_hours))
        .bind(Json(&space.pricing.time_blocks))
        .bind(Json(&space.pricing.special_events))
        .bind(space.policy.min_booking_hours)
        .bind(space.policy.max_booking_hours)
        .bind(space.policy.advance_booking_days)
        .bind(space.policy.cancellation_policy)
        .bind(space.created_at)
        .bind(space.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(db_err("Failed to create space"))?;

        Self::sync_promos(&mut tx, space.id, &space.pricing.promo_codes).await?;

        tx.commit()
            .await
            .map_err(db_err("Failed to commit space creation"))?;

        debug!(space_id = %space.id, "Space row inserted");
        self.fetch(space.id).await
    }

    async fn update(&self, space: &Space) -> AppResult<Space> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        let result = sqlx::query(
            "UPDATE spaces SET name = $2, description = $3, address = $4, space_type = $5, capacity = $6, \
             is_active = $7, is_free = $8, base_price = $9, day_rate = $10, peak_hours = $11, \
             time_blocks = $12, special_events = $13, min_booking_hours = $14, max_booking_hours = $15, \
             advance_booking_days = $16, cancellation_policy = $17, updated_at = $18 \
             WHERE id = $1",
        )
        .bind(space.id)
        .bind(&space.name)
        .bind(&space.description)
        .bind(&space.address)
        .bind(space.space_type)
        .bind(space.capacity)
        .bind(space.is_active)
        .bind(space.pricing.is_free)
        .bind(space.pricing.base_price)
        .bind(space.pricing.day_rate)
        .bind(Json(&space.pricing.peak_hours))
        .bind(Json(&space.pricing.time_blocks))
        .bind(Json(&space.pricing.special_events))
        .bind(space.policy.min_booking_hours)
        .bind(space.policy.max_booking_hours)
        .bind(space.policy.advance_booking_days)
        .bind(space.policy.cancellation_policy)
        .bind(space.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(db_err("Failed to update space"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Space {} not found", space.id)));
        }

        Self::sync_promos(&mut tx, space.id, &space.pricing.promo_codes).await?;

        tx.commit()
            .await
            .map_err(db_err("Failed to commit space update"))?;

        self.fetch(space.id).await
    }

    async fn delete(&self, id: SpaceId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM spaces WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err("Failed to delete space"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Space {id} not found")));
        }
        Ok(())
    }

    async fn list(
        &self,
        filter: &SpaceFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Space>> {
        const WHERE: &str = "WHERE ($1::space_type IS NULL OR space_type = $1) \
             AND ($2::uuid IS NULL OR owner_id = $2) \
             AND ($3 OR is_active)";

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM spaces {WHERE}"))
            .bind(filter.space_type)
            .bind(filter.owner_id)
            .bind(filter.include_inactive)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err("Failed to count spaces"))?;

        let rows = sqlx::query_as::<_, SpaceRow>(&format!(
            "SELECT * FROM spaces {WHERE} ORDER BY created_at DESC LIMIT $4 OFFSET $5"
        ))
        .bind(filter.space_type)
        .bind(filter.owner_id)
        .bind(filter.include_inactive)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list spaces"))?;

        let ids: Vec<SpaceId> = rows.iter().map(|r| r.id).collect();
        let mut promos = self.promos_for(&ids).await?;
        let spaces = rows
            .into_iter()
            .map(|row| {
                let codes = promos.remove(&row.id).unwrap_or_default();
                row.into_space(codes)
            })
            .collect();

        Ok(PageResponse::new(
            spaces,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn redeem_promo(
        &self,
        space_id: SpaceId,
        code: &str,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE space_promo_codes SET current_uses = current_uses + 1 \
             WHERE space_id = $1 AND code = $2 AND current_uses < max_uses \
             AND valid_from <= $3 AND valid_until >= $3",
        )
        .bind(space_id)
        .bind(code)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_err("Failed to redeem promo code"))?;

        Ok(result.rows_affected() == 1)
    }
}
