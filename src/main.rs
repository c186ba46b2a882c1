use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use countdown_api::{
    config::Config,
    db::{self, MemoryTimerStore, PgTimerStore, TimerStore},
    routes, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn TimerStore> = match &config.database_url {
        Some(url) => {
            let pool = db::create_pool(url, config.db_max_connections).await?;
            db::run_migrations(&pool).await?;
            info!("Database connected and migrations applied");
            Arc::new(PgTimerStore::new(pool))
        }
        None => {
            warn!("DATABASE_URL not set; timers are kept in memory and lost on restart");
            Arc::new(MemoryTimerStore::new())
        }
    };

    let addr = format!("{}:{}", config.host, config.port);
    let app = routes::build_router(AppState::new(store, config));

    info!("countdown timer API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
