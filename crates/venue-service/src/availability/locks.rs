//! Keyed async locks serializing booking creation per (space, date).

use std::sync::Arc;

use chrono::NaiveDate;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use venue_core::types::SpaceId;

/// One async mutex per (space, date) slot.
#[derive(Debug, Default)]
pub struct SlotLocks {
    slots: DashMap<(SpaceId, NaiveDate), Arc<Mutex<()>>>,
}

impl SlotLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to the slot.
    ///
    /// The guard releases the slot when dropped.
    pub async fn acquire(&self, space_id: SpaceId, date: NaiveDate) -> OwnedMutexGuard<()> {
        let slot = self
            .slots
            .entry((space_id, date))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        slot.lock_owned().await
    }

    /// Drop slots nobody is holding or waiting on.
    pub fn prune(&self) {
        self.slots.retain(|_, slot| Arc::strong_count(slot) > 1);
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
    }

    #[tokio::test]
    async fn test_same_slot_is_exclusive() {
        let locks = Arc::new(SlotLocks::new());
        let space = SpaceId::new();

        let guard = locks.acquire(space, day()).await;
        let contender = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.acquire(space, day()).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());
        drop(guard);
        contender.await.unwrap();
    }

    #[tokio::test]
    async fn test_other_slots_do_not_block() {
        let locks = SlotLocks::new();
        let space = SpaceId::new();

        let _a = locks.acquire(space, day()).await;
        let _b = locks.acquire(space, day().succ_opt().unwrap()).await;
        let _c = locks.acquire(SpaceId::new(), day()).await;
        assert_eq!(locks.len(), 3);
    }

    #[tokio::test]
    async fn test_prune_drops_idle_slots() {
        let locks = SlotLocks::new();
        let held = locks.acquire(SpaceId::new(), day()).await;
        drop(locks.acquire(SpaceId::new(), day()).await);

        locks.prune();
        assert_eq!(locks.len(), 1);
        drop(held);
        locks.prune();
        assert!(locks.is_empty());
    }
}
