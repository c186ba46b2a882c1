use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StoreError, TimerStore};
use crate::models::timer::{NewTimer, Timer, TimerPatch};

/// Process-local store used when no `DATABASE_URL` is configured, and by the tests.
/// Timers are kept in creation order; listing walks the vector backwards.
#[derive(Default)]
pub struct MemoryTimerStore {
    timers: RwLock<Vec<Timer>>,
}

impl MemoryTimerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TimerStore for MemoryTimerStore {
    async fn create(&self, shop: &str, timer: NewTimer) -> Result<Timer, StoreError> {
        let now = Utc::now();
        let record = Timer {
            id: Uuid::new_v4(),
            shop: shop.to_owned(),
            product_id: timer.product_id,
            name: timer.name,
            promotion: timer.promotion,
            start_at: timer.start_at,
            end_at: timer.end_at,
            color: timer.color,
            size: timer.size,
            position: timer.position,
            urgency: timer.urgency,
            created_at: now,
            updated_at: now,
        };
        self.timers.write().await.push(record.clone());
        Ok(record)
    }

    async fn list(&self, shop: &str) -> Result<Vec<Timer>, StoreError> {
        let timers = self.timers.read().await;
        Ok(timers.iter().rev().filter(|t| t.shop == shop).cloned().collect())
    }

    async fn get(&self, shop: &str, id: Uuid) -> Result<Timer, StoreError> {
        let timers = self.timers.read().await;
        timers
            .iter()
            .find(|t| t.id == id && t.shop == shop)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn update(&self, shop: &str, id: Uuid, patch: TimerPatch) -> Result<Timer, StoreError> {
        let mut timers = self.timers.write().await;
        let timer = timers
            .iter_mut()
            .find(|t| t.id == id && t.shop == shop)
            .ok_or(StoreError::NotFound)?;
        patch.apply_to(timer);
        timer.updated_at = Utc::now();
        Ok(timer.clone())
    }

    async fn delete(&self, shop: &str, id: Uuid) -> Result<(), StoreError> {
        self.timers
            .write()
            .await
            .retain(|t| !(t.id == id && t.shop == shop));
        Ok(())
    }

    async fn public_query(&self, shop: &str, product_id: Option<&str>) -> Result<Vec<Timer>, StoreError> {
        let timers = self.timers.read().await;
        let newest_first = timers.iter().rev().filter(|t| t.shop == shop);
        let Some(product_id) = product_id else {
            return Ok(newest_first.cloned().collect());
        };

        let (bound, store_wide): (Vec<&Timer>, Vec<&Timer>) = newest_first
            .filter(|t| t.product_id.is_none() || t.product_id.as_deref() == Some(product_id))
            .partition(|t| t.product_id.is_some());
        Ok(bound.into_iter().chain(store_wide).cloned().collect())
    }

    async fn purge_expired(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        let mut timers = self.timers.write().await;
        let before = timers.len();
        timers.retain(|t| t.end_at >= cutoff);
        Ok((before - timers.len()) as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
