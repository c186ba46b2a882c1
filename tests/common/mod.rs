#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use countdown_api::{
    config::Config,
    db::MemoryTimerStore,
    middleware::session::issue_session_token,
    routes::build_router,
    AppState,
};

pub const SECRET: &str = "integration-test-secret";
pub const SHOP_A: &str = "shop-a.myshopify.com";
pub const SHOP_B: &str = "shop-b.myshopify.com";

pub fn router() -> Router {
    build_router(AppState::new(Arc::new(MemoryTimerStore::new()), Config::in_memory(SECRET)))
}

pub fn token_for(shop: &str) -> String {
    issue_session_token(shop, SECRET, 3600).unwrap()
}

/// Serves a fresh in-memory API on an ephemeral port and returns its base URL.
pub async fn spawn_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}
