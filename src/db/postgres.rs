use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{StoreError, TimerStore};
use crate::models::timer::{NewTimer, Timer, TimerPatch, TimerRow};

#[derive(Clone)]
pub struct PgTimerStore {
    pool: PgPool,
}

impl PgTimerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn into_timer(row: TimerRow) -> Result<Timer, StoreError> {
    Timer::try_from(row).map_err(|e| StoreError::Corrupt(e.to_string()))
}

fn into_timers(rows: Vec<TimerRow>) -> Result<Vec<Timer>, StoreError> {
    rows.into_iter().map(into_timer).collect()
}

#[async_trait]
impl TimerStore for PgTimerStore {
    async fn create(&self, shop: &str, timer: NewTimer) -> Result<Timer, StoreError> {
        let row = sqlx::query_as::<_, TimerRow>(
            "INSERT INTO timers
                (shop, product_id, name, promotion, start_at, end_at, color, size, position, urgency)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING *",
        )
        .bind(shop)
        .bind(&timer.product_id)
        .bind(&timer.name)
        .bind(&timer.promotion)
        .bind(timer.start_at)
        .bind(timer.end_at)
        .bind(&timer.color)
        .bind(timer.size.as_str())
        .bind(timer.position.as_str())
        .bind(timer.urgency.map(|u| u.as_str()))
        .fetch_one(&self.pool)
        .await?;
        into_timer(row)
    }

    async fn list(&self, shop: &str) -> Result<Vec<Timer>, StoreError> {
        let rows = sqlx::query_as::<_, TimerRow>(
            "SELECT * FROM timers WHERE shop = $1 ORDER BY created_at DESC",
        )
        .bind(shop)
        .fetch_all(&self.pool)
        .await?;
        into_timers(rows)
    }

    async fn get(&self, shop: &str, id: Uuid) -> Result<Timer, StoreError> {
        let row = sqlx::query_as::<_, TimerRow>("SELECT * FROM timers WHERE id = $1 AND shop = $2")
            .bind(id)
            .bind(shop)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;
        into_timer(row)
    }

    async fn update(&self, shop: &str, id: Uuid, patch: TimerPatch) -> Result<Timer, StoreError> {
        // Clearable columns take a "present" flag so that NULL can be written.
        let row = sqlx::query_as::<_, TimerRow>(
            "UPDATE timers
             SET product_id = CASE WHEN $1 THEN $2 ELSE product_id END,
                 name       = COALESCE($3, name),
                 promotion  = CASE WHEN $4 THEN $5 ELSE promotion END,
                 start_at   = COALESCE($6, start_at),
                 end_at     = COALESCE($7, end_at),
                 color      = COALESCE($8, color),
                 size       = COALESCE($9, size),
                 position   = COALESCE($10, position),
                 urgency    = CASE WHEN $11 THEN $12 ELSE urgency END,
                 updated_at = NOW()
             WHERE id = $13 AND shop = $14
             RETURNING *",
        )
        .bind(patch.product_id.is_some())
        .bind(patch.product_id.as_ref().and_then(|p| p.as_deref()))
        .bind(&patch.name)
        .bind(patch.promotion.is_some())
        .bind(patch.promotion.as_ref().and_then(|p| p.as_deref()))
        .bind(patch.start_at)
        .bind(patch.end_at)
        .bind(&patch.color)
        .bind(patch.size.map(|s| s.as_str()))
        .bind(patch.position.map(|p| p.as_str()))
        .bind(patch.urgency.is_some())
        .bind(patch.urgency.flatten().map(|u| u.as_str()))
        .bind(id)
        .bind(shop)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;
        into_timer(row)
    }

    async fn delete(&self, shop: &str, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM timers WHERE id = $1 AND shop = $2")
            .bind(id)
            .bind(shop)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn public_query(&self, shop: &str, product_id: Option<&str>) -> Result<Vec<Timer>, StoreError> {
        let rows = match product_id {
            Some(product_id) => {
                sqlx::query_as::<_, TimerRow>(
                    "SELECT * FROM timers
                     WHERE shop = $1 AND (product_id = $2 OR product_id IS NULL)
                     ORDER BY (product_id IS NULL), created_at DESC",
                )
                .bind(shop)
                .bind(product_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, TimerRow>(
                    "SELECT * FROM timers WHERE shop = $1 ORDER BY created_at DESC",
                )
                .bind(shop)
                .fetch_all(&self.pool)
                .await?
            }
        };
        into_timers(rows)
    }

    async fn purge_expired(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM timers WHERE end_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
