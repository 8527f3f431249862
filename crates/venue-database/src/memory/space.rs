//! In-memory space store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use venue_core::error::AppError;
use venue_core::result::AppResult;
use venue_core::types::SpaceId;
use venue_core::types::pagination::{PageRequest, PageResponse};
use venue_entity::space::Space;

use crate::store::{SpaceFilter, SpaceStore};

/// [`SpaceStore`] keeping spaces in a process-local map.
#[derive(Debug, Clone, Default)]
pub struct MemorySpaceStore {
    spaces: Arc<Mutex<HashMap<SpaceId, Space>>>,
}

impl MemorySpaceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SpaceStore for MemorySpaceStore {
    async fn find_by_id(&self, id: SpaceId) -> AppResult<Option<Space>> {
        Ok(self.spaces.lock().await.get(&id).cloned())
    }

    async fn create(&self, space: &Space) -> AppResult<Space> {
        let mut spaces = self.spaces.lock().await;
        if spaces.contains_key(&space.id) {
            return Err(AppError::conflict(format!("Space {} already exists", space.id)));
        }
        spaces.insert(space.id, space.clone());
        Ok(space.clone())
    }

    async fn update(&self, space: &Space) -> AppResult<Space> {
        let mut spaces = self.spaces.lock().await;
        let stored = spaces
            .get_mut(&space.id)
            .ok_or_else(|| AppError::not_found(format!("Space {} not found", space.id)))?;

        let mut updated = space.clone();
        for promo in &mut updated.pricing.promo_codes {
            if let Some(existing) = stored.pricing.promo(&promo.code) {
                promo.current_uses = existing.current_uses;
            }
        }
        *stored = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: SpaceId) -> AppResult<()> {
        self.spaces
            .lock()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(format!("Space {id} not found")))
    }

    async fn list(
        &self,
        filter: &SpaceFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Space>> {
        let mut matching: Vec<Space> = self
            .spaces
            .lock()
            .await
            .values()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page.paginate(matching))
    }

    async fn redeem_promo(
        &self,
        space_id: SpaceId,
        code: &str,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut spaces = self.spaces.lock().await;
        let Some(space) = spaces.get_mut(&space_id) else {
            return Ok(false);
        };
        match space
            .pricing
            .promo_codes
            .iter_mut()
            .find(|p| p.is_redeemable(code, now))
        {
            Some(promo) => {
                promo.current_uses += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal::Decimal;
    use venue_core::types::UserId;
    use venue_entity::pricing::{PricingConfig, PromoCode};
    use venue_entity::space::{BookingPolicy, CreateSpace, SpaceType};

    fn space_with_promo(max_uses: i32) -> Space {
        let now = Utc::now();
        let mut pricing = PricingConfig::hourly(Decimal::from(100));
        pricing.promo_codes.push(
            PromoCode::new("ONCE", Decimal::TEN, now - Duration::days(1), now + Duration::days(1), max_uses)
                .unwrap(),
        );
        CreateSpace {
            owner_id: UserId::new(),
            name: "Loft".into(),
            description: String::new(),
            address: String::new(),
            space_type: SpaceType::Experience,
            capacity: 4,
            pricing,
            policy: BookingPolicy::default(),
        }
        .into_space(now)
    }

    #[tokio::test]
    async fn test_redeem_promo_respects_max_uses() {
        let store = MemorySpaceStore::new();
        let space = store.create(&space_with_promo(1)).await.unwrap();

        assert!(store.redeem_promo(space.id, "ONCE", Utc::now()).await.unwrap());
        assert!(!store.redeem_promo(space.id, "ONCE", Utc::now()).await.unwrap());
        assert!(!store.redeem_promo(space.id, "NOPE", Utc::now()).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_keeps_redemption_count() {
        let store = MemorySpaceStore::new();
        let space = store.create(&space_with_promo(5)).await.unwrap();
        store.redeem_promo(space.id, "ONCE", Utc::now()).await.unwrap();

        let mut edited = space.clone();
        edited.pricing.promo_codes[0].max_uses = 10;
        let updated = store.update(&edited).await.unwrap();

        assert_eq!(updated.pricing.promo_codes[0].current_uses, 1);
        assert_eq!(updated.pricing.promo_codes[0].max_uses, 10);
    }

    #[tokio::test]
    async fn test_list_hides_inactive_by_default() {
        let store = MemorySpaceStore::new();
        let mut inactive = space_with_promo(1);
        inactive.is_active = false;
        store.create(&inactive).await.unwrap();
        store.create(&space_with_promo(1)).await.unwrap();

        let page = store
            .list(&SpaceFilter::default(), &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total_items, 1);

        let all = SpaceFilter {
            include_inactive: true,
            ..SpaceFilter::default()
        };
        let page = store.list(&all, &PageRequest::default()).await.unwrap();
        assert_eq!(page.total_items, 2);
    }
}
