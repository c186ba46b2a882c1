use tracing::info;
use uuid::Uuid;

use crate::{
    db::TimerStore,
    error::ApiError,
    models::timer::{CreateTimerRequest, NewTimer, Timer, TimerPatch, UpdateTimerRequest, DEFAULT_COLOR},
    services::metrics::{
        PUBLIC_QUERIES_COUNTER, TIMERS_CREATED_COUNTER, TIMERS_DELETED_COUNTER, TIMERS_UPDATED_COUNTER,
    },
};

pub struct TimerService;

impl TimerService {
    /// Checks required fields and applies defaults. The start/end ordering is
    /// left to the admin form.
    pub fn validate_new(req: CreateTimerRequest) -> Result<NewTimer, ApiError> {
        let name = req.name.map(|n| n.trim().to_owned()).filter(|n| !n.is_empty());

        let mut missing = Vec::new();
        if name.is_none() {
            missing.push("timerName is required");
        }
        if req.start_at.is_none() {
            missing.push("startAt is required");
        }
        if req.end_at.is_none() {
            missing.push("endAt is required");
        }

        match (name, req.start_at, req.end_at) {
            (Some(name), Some(start_at), Some(end_at)) => Ok(NewTimer {
                product_id: req.product_id.filter(|p| !p.is_empty()),
                name,
                promotion: req.promotion,
                start_at,
                end_at,
                color: req.color.filter(|c| !c.trim().is_empty()).unwrap_or_else(|| DEFAULT_COLOR.to_owned()),
                size: req.size.unwrap_or_default(),
                position: req.position.unwrap_or_default(),
                urgency: req.urgency,
            }),
            _ => Err(ApiError::Validation(format!(
                "Timer validation failed: {}",
                missing.join(", ")
            ))),
        }
    }

    pub fn validate_patch(req: UpdateTimerRequest) -> Result<TimerPatch, ApiError> {
        let name = match req.name {
            Some(name) if name.trim().is_empty() => {
                return Err(ApiError::Validation("Timer validation failed: timerName cannot be empty".into()))
            }
            other => other.map(|n| n.trim().to_owned()),
        };

        // An empty string clears the attribute, as on create where it means absent.
        let blank_to_none = |v: Option<Option<String>>| v.map(|inner| inner.filter(|s| !s.trim().is_empty()));

        Ok(TimerPatch {
            product_id: blank_to_none(req.product_id),
            name,
            promotion: blank_to_none(req.promotion),
            start_at: req.start_at,
            end_at: req.end_at,
            color: req.color,
            size: req.size,
            position: req.position,
            urgency: req.urgency,
        })
    }

    pub async fn create(store: &dyn TimerStore, shop: &str, req: CreateTimerRequest) -> Result<Timer, ApiError> {
        let new_timer = Self::validate_new(req)?;
        let timer = store.create(shop, new_timer).await?;
        TIMERS_CREATED_COUNTER.with_label_values(&[shop]).inc();
        info!("timer(id: {}, name: {}) created for shop {}", timer.id, timer.name, shop);
        Ok(timer)
    }

    pub async fn list(store: &dyn TimerStore, shop: &str) -> Result<Vec<Timer>, ApiError> {
        Ok(store.list(shop).await?)
    }

    pub async fn get(store: &dyn TimerStore, shop: &str, id: Uuid) -> Result<Timer, ApiError> {
        Ok(store.get(shop, id).await?)
    }

    pub async fn update(
        store: &dyn TimerStore,
        shop: &str,
        id: Uuid,
        req: UpdateTimerRequest,
    ) -> Result<Timer, ApiError> {
        let patch = Self::validate_patch(req)?;
        let timer = store.update(shop, id, patch).await?;
        TIMERS_UPDATED_COUNTER.with_label_values(&[shop]).inc();
        info!("timer(id: {}) updated for shop {}", id, shop);
        Ok(timer)
    }

    pub async fn delete(store: &dyn TimerStore, shop: &str, id: Uuid) -> Result<(), ApiError> {
        store.delete(shop, id).await?;
        TIMERS_DELETED_COUNTER.with_label_values(&[shop]).inc();
        info!("timer(id: {}) deleted for shop {}", id, shop);
        Ok(())
    }

    pub async fn public_query(
        store: &dyn TimerStore,
        shop: &str,
        product_id: Option<&str>,
    ) -> Result<Vec<Timer>, ApiError> {
        let timers = store.public_query(shop, product_id).await?;
        let result = if timers.is_empty() { "miss" } else { "hit" };
        PUBLIC_QUERIES_COUNTER.with_label_values(&[result]).inc();
        Ok(timers)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::models::timer::{TimerPosition, TimerSize, UrgencyStyle};

    fn complete_request() -> CreateTimerRequest {
        let start = Utc::now();
        CreateTimerRequest {
            name: Some("  Flash Sale ".into()),
            start_at: Some(start),
            end_at: Some(start + Duration::hours(1)),
            urgency: Some(UrgencyStyle::Banner),
            ..CreateTimerRequest::default()
        }
    }

    #[test]
    fn defaults_are_applied() {
        let timer = TimerService::validate_new(complete_request()).unwrap();
        assert_eq!(timer.name, "Flash Sale");
        assert_eq!(timer.color, DEFAULT_COLOR);
        assert_eq!(timer.size, TimerSize::Medium);
        assert_eq!(timer.position, TimerPosition::Top);
        assert_eq!(timer.urgency, Some(UrgencyStyle::Banner));
    }

    #[test]
    fn missing_fields_are_all_reported() {
        let err = TimerService::validate_new(CreateTimerRequest {
            name: Some("   ".into()),
            ..CreateTimerRequest::default()
        })
        .unwrap_err();
        match err {
            ApiError::Validation(msg) => {
                assert!(msg.contains("timerName is required"));
                assert!(msg.contains("startAt is required"));
                assert!(msg.contains("endAt is required"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn start_after_end_is_not_rejected_by_the_server() {
        let mut req = complete_request();
        std::mem::swap(&mut req.start_at, &mut req.end_at);
        assert!(TimerService::validate_new(req).is_ok());
    }

    #[test]
    fn patch_turns_empty_product_id_into_store_wide() {
        let req = UpdateTimerRequest {
            product_id: Some(Some(String::new())),
            promotion: Some(Some("  ".into())),
            ..UpdateTimerRequest::default()
        };
        let patch = TimerService::validate_patch(req).unwrap();
        assert_eq!(patch.product_id, Some(None));
        assert_eq!(patch.promotion, Some(None));

        let untouched = TimerService::validate_patch(UpdateTimerRequest::default()).unwrap();
        assert_eq!(untouched.product_id, None);
    }

    #[test]
    fn patch_rejects_blank_name() {
        let req = UpdateTimerRequest {
            name: Some(" ".into()),
            ..UpdateTimerRequest::default()
        };
        assert!(matches!(TimerService::validate_patch(req), Err(ApiError::Validation(_))));
    }
}
