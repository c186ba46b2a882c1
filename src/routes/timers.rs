use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::ApiError,
    middleware::session::ShopSession,
    models::timer::{CreateTimerRequest, Timer, UpdateTimerRequest},
    services::timers::TimerService,
    AppState,
};

/// Ids that do not parse can never match a stored timer.
fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::Validation(rejection.body_text()))
}

pub async fn list_timers(
    State(state): State<AppState>,
    ShopSession { shop }: ShopSession,
) -> Result<Json<Vec<Timer>>, ApiError> {
    TimerService::list(state.store.as_ref(), &shop).await.map(Json)
}

pub async fn create_timer(
    State(state): State<AppState>,
    ShopSession { shop }: ShopSession,
    payload: Result<Json<CreateTimerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Timer>), ApiError> {
    let req = body(payload)?;
    let timer = TimerService::create(state.store.as_ref(), &shop, req).await?;
    Ok((StatusCode::CREATED, Json(timer)))
}

pub async fn get_timer(
    State(state): State<AppState>,
    ShopSession { shop }: ShopSession,
    Path(id): Path<String>,
) -> Result<Json<Timer>, ApiError> {
    let id = parse_id(&id).ok_or(ApiError::NotFound)?;
    TimerService::get(state.store.as_ref(), &shop, id).await.map(Json)
}

pub async fn update_timer(
    State(state): State<AppState>,
    ShopSession { shop }: ShopSession,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTimerRequest>, JsonRejection>,
) -> Result<Json<Timer>, ApiError> {
    let id = parse_id(&id).ok_or(ApiError::NotFound)?;
    let req = body(payload)?;
    TimerService::update(state.store.as_ref(), &shop, id, req).await.map(Json)
}

pub async fn delete_timer(
    State(state): State<AppState>,
    ShopSession { shop }: ShopSession,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if let Some(id) = parse_id(&id) {
        TimerService::delete(state.store.as_ref(), &shop, id).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}
