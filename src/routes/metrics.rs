use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
};
use prometheus::{TextEncoder, TEXT_FORMAT};

/// GET /metrics: Prometheus scrape endpoint. Keep it off the public ingress.
pub async fn metrics_handler() -> Result<impl IntoResponse, StatusCode> {
    let body = TextEncoder::new()
        .encode_to_string(&prometheus::gather())
        .map_err(|e| {
            tracing::warn!("Metrics: encoding failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
    Ok(([(header::CONTENT_TYPE, TEXT_FORMAT)], body))
}
