pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::timer::{NewTimer, Timer, TimerPatch};

pub use memory::MemoryTimerStore;
pub use postgres::PgTimerStore;

pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Run the migrations embedded from ./migrations/
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// No timer with that id belongs to the requesting shop.
    #[error("timer not found")]
    NotFound,
    #[error("corrupt timer row: {0}")]
    Corrupt(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Persistence for timers. Every operation except `purge_expired` is scoped to one shop.
#[async_trait]
pub trait TimerStore: Send + Sync {
    async fn create(&self, shop: &str, timer: NewTimer) -> Result<Timer, StoreError>;

    /// All timers of the shop, newest-created first.
    async fn list(&self, shop: &str) -> Result<Vec<Timer>, StoreError>;

    async fn get(&self, shop: &str, id: Uuid) -> Result<Timer, StoreError>;

    /// Merge `patch` into the stored timer and refresh `updated_at`.
    async fn update(&self, shop: &str, id: Uuid, patch: TimerPatch) -> Result<Timer, StoreError>;

    /// Idempotent: deleting a missing timer is not an error.
    async fn delete(&self, shop: &str, id: Uuid) -> Result<(), StoreError>;

    /// Timers visible to the storefront. With a product id, timers bound to that
    /// product come first, followed by store-wide timers; each group newest first.
    /// No filtering on start/end time.
    async fn public_query(&self, shop: &str, product_id: Option<&str>) -> Result<Vec<Timer>, StoreError>;

    /// Hard-delete timers of every shop whose `end_at` is before `cutoff`.
    async fn purge_expired(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}
