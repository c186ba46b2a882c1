use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::ApiError,
    middleware::shop::normalize_shop,
    models::timer::{PublicTimerQuery, Timer},
    services::timers::TimerService,
    AppState,
};

/// GET /api/public/timers?shop=..&productId=..: unauthenticated lookup for the
/// storefront widget. Expired timers are returned too; the widget decides.
pub async fn list_public_timers(
    State(state): State<AppState>,
    Query(query): Query<PublicTimerQuery>,
) -> Result<Json<Vec<Timer>>, ApiError> {
    let shop = normalize_shop(query.shop.as_deref().unwrap_or_default())?;
    let product_id = query.product_id.as_deref().filter(|p| !p.is_empty());
    TimerService::public_query(state.store.as_ref(), &shop, product_id)
        .await
        .map(Json)
}
