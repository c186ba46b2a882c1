pub mod health;
pub mod metrics;
pub mod public;
pub mod timers;

use axum::{
    http::{header, HeaderValue, Method, Uri},
    routing::get,
    Router,
};
use tower_http::cors::{AllowHeaders, AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::{config::Config, AppState};

/// `http://localhost[:port]` or `http://127.0.0.1[:port]`, compared on the parsed host.
fn is_local_origin(origin: &str) -> bool {
    let Ok(uri) = origin.parse::<Uri>() else {
        return false;
    };
    uri.scheme_str() == Some("http")
        && matches!(uri.host(), Some("localhost") | Some("127.0.0.1"))
        && uri.path_and_query().map_or(true, |pq| pq.as_str() == "/" || pq.as_str().is_empty())
}

/// Admin routes accept the configured admin origin plus localhost for development.
fn admin_cors(config: &Config) -> CorsLayer {
    let admin_origin = config.admin_origin.clone();
    let origin = AllowOrigin::predicate(move |origin: &HeaderValue, _| {
        let o = match origin.to_str() {
            Ok(s) => s,
            Err(_) => return false,
        };
        o == admin_origin || is_local_origin(o)
    });

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(AllowHeaders::list([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ]))
        .allow_origin(origin)
}

/// The widget runs on arbitrary storefront domains.
fn public_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_origin(Any)
}

pub fn build_router(state: AppState) -> Router {
    let admin = Router::new()
        .route("/api/timers", get(timers::list_timers).post(timers::create_timer))
        .route(
            "/api/timers/{id}",
            get(timers::get_timer)
                .put(timers::update_timer)
                .delete(timers::delete_timer),
        )
        .layer(admin_cors(&state.config));

    let public = Router::new()
        .route("/api/public/timers", get(public::list_public_timers))
        .layer(public_cors());

    Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::metrics_handler))
        .merge(admin)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
