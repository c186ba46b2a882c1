//! Delete timers whose end passed more than N days ago.
//! The public endpoint keeps serving expired timers; this job is the retention cutoff.
//! Run daily (e.g., via cron job: 0 3 * * * /app/purge-expired --older-than-days 30)
//!
//! Usage: purge-expired [--older-than-days N] [--dry-run]

use chrono::{Duration, Utc};
use clap::Parser;

use countdown_api::db::{self, PgTimerStore, TimerStore};

#[derive(Parser)]
#[command(name = "purge-expired", about = "Purge long-expired countdown timers")]
struct Args {
    /// Keep timers that ended less than this many days ago
    #[arg(long, default_value_t = 30)]
    older_than_days: i64,

    /// Only report how many timers would be removed
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();
    anyhow::ensure!(args.older_than_days >= 0, "--older-than-days must not be negative");

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("Missing required env var: DATABASE_URL"))?;
    let pool = db::create_pool(&database_url, 2).await?;
    db::run_migrations(&pool).await?;

    let store = PgTimerStore::new(pool);

    let cutoff = Utc::now() - Duration::days(args.older_than_days);
    tracing::info!("Purging timers that ended before {}", cutoff);

    if args.dry_run {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM timers WHERE end_at < $1")
            .bind(cutoff)
            .fetch_one(store.pool())
            .await?;
        tracing::info!("Dry run: {} timer(s) would be purged", count);
        return Ok(());
    }

    let purged = store.purge_expired(cutoff).await?;
    tracing::info!("Purged {} expired timer(s)", purged);

    Ok(())
}
