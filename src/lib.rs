//! Countdown-timer promotions: the timer API, the admin console state
//! machines and the storefront countdown widget.

pub mod admin;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod widget;

use std::sync::Arc;

use config::Config;
use db::TimerStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TimerStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn TimerStore>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}
