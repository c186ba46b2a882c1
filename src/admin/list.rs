//! State of the timer list screen: loading, display and per-row deletion.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::{
    client::{ClientError, TimerApiClient},
    models::timer::Timer,
    widget::countdown::TimerStatus,
};

pub const EMPTY_MESSAGE: &str = "No timers yet.";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerListView {
    pub loading: bool,
    pub timers: Vec<Timer>,
    /// Dismissible error banner.
    pub error: Option<String>,
    /// Row whose deletion waits for the user's confirmation.
    pub confirming: Option<Uuid>,
    /// Rows whose delete request is in flight.
    pub deleting: BTreeSet<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ListDisplay {
    Loading,
    Empty { message: &'static str },
    Table { rows: Vec<TimerRowView> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerRowView {
    pub id: Uuid,
    pub name: String,
    pub promotion: Option<String>,
    pub starts: String,
    pub ends: String,
    pub status: TimerStatus,
    pub busy: bool,
}

impl TimerListView {
    pub fn start_loading(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn loaded(&mut self, timers: Vec<Timer>) {
        self.loading = false;
        self.timers = timers;
        self.confirming = None;
        self.deleting.clear();
    }

    pub fn load_failed(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }

    pub fn display(&self, now: DateTime<Utc>) -> ListDisplay {
        if self.loading {
            return ListDisplay::Loading;
        }
        if self.timers.is_empty() {
            return ListDisplay::Empty { message: EMPTY_MESSAGE };
        }
        let rows = self
            .timers
            .iter()
            .map(|t| TimerRowView {
                id: t.id,
                name: t.name.clone(),
                promotion: t.promotion.clone(),
                starts: t.start_at.format("%Y-%m-%d %H:%M").to_string(),
                ends: t.end_at.format("%Y-%m-%d %H:%M").to_string(),
                status: TimerStatus::of(t.start_at, t.end_at, now),
                busy: self.deleting.contains(&t.id),
            })
            .collect();
        ListDisplay::Table { rows }
    }

    /// Asks for confirmation before deleting `id`. Returns false when the row is
    /// unknown or already being deleted.
    pub fn request_delete(&mut self, id: Uuid) -> bool {
        if self.deleting.contains(&id) || !self.timers.iter().any(|t| t.id == id) {
            return false;
        }
        self.confirming = Some(id);
        true
    }

    pub fn cancel_delete(&mut self) {
        self.confirming = None;
    }

    /// Confirms the pending deletion and marks that row busy. Returns the id to
    /// delete, or `None` if nothing was awaiting confirmation.
    pub fn confirm_delete(&mut self) -> Option<Uuid> {
        let id = self.confirming.take()?;
        if !self.deleting.insert(id) {
            return None;
        }
        Some(id)
    }

    /// Removes the row locally; no refetch.
    pub fn delete_succeeded(&mut self, id: Uuid) {
        self.deleting.remove(&id);
        self.timers.retain(|t| t.id != id);
    }

    pub fn delete_failed(&mut self, id: Uuid, message: impl Into<String>) {
        self.deleting.remove(&id);
        self.error = Some(message.into());
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub async fn refresh(&mut self, client: &TimerApiClient) -> Result<(), ClientError> {
        self.start_loading();
        match client.list_timers().await {
            Ok(timers) => {
                self.loaded(timers);
                Ok(())
            }
            Err(e) => {
                warn!("Failed to load timers: {}", e);
                self.load_failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Sends the confirmed deletion. `Ok(None)` when there was nothing to delete.
    pub async fn confirm_and_delete(&mut self, client: &TimerApiClient) -> Result<Option<Uuid>, ClientError> {
        let Some(id) = self.confirm_delete() else {
            return Ok(None);
        };
        match client.delete_timer(id).await {
            Ok(()) => {
                self.delete_succeeded(id);
                Ok(Some(id))
            }
            Err(e) => {
                warn!("Failed to delete timer {}: {}", id, e);
                self.delete_failed(id, e.to_string());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::models::timer::{TimerPosition, TimerSize, DEFAULT_COLOR};

    fn timer(name: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Timer {
        Timer {
            id: Uuid::new_v4(),
            shop: "demo-shop.myshopify.com".into(),
            product_id: None,
            name: name.into(),
            promotion: None,
            start_at: start,
            end_at: end,
            color: DEFAULT_COLOR.into(),
            size: TimerSize::Medium,
            position: TimerPosition::Top,
            urgency: None,
            created_at: start,
            updated_at: start,
        }
    }

    fn loaded_view() -> (TimerListView, Uuid, Uuid) {
        let now = Utc::now();
        let a = timer("a", now - Duration::hours(1), now + Duration::hours(1));
        let b = timer("b", now - Duration::hours(2), now - Duration::hours(1));
        let (a_id, b_id) = (a.id, b.id);
        let mut view = TimerListView::default();
        view.start_loading();
        view.loaded(vec![a, b]);
        (view, a_id, b_id)
    }

    #[test]
    fn display_follows_loading_state() {
        let mut view = TimerListView::default();
        view.start_loading();
        assert_eq!(view.display(Utc::now()), ListDisplay::Loading);

        view.loaded(Vec::new());
        assert_eq!(view.display(Utc::now()), ListDisplay::Empty { message: EMPTY_MESSAGE });
    }

    #[test]
    fn rows_carry_derived_status() {
        let (view, a_id, b_id) = loaded_view();
        let ListDisplay::Table { rows } = view.display(Utc::now()) else {
            panic!("expected a table");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, a_id);
        assert_eq!(rows[0].status, TimerStatus::Active);
        assert_eq!(rows[1].id, b_id);
        assert_eq!(rows[1].status, TimerStatus::Expired);
    }

    #[test]
    fn delete_requires_confirmation() {
        let (mut view, a_id, _) = loaded_view();
        assert_eq!(view.confirm_delete(), None);

        assert!(view.request_delete(a_id));
        view.cancel_delete();
        assert_eq!(view.confirm_delete(), None);
        assert_eq!(view.timers.len(), 2);
    }

    #[test]
    fn only_the_targeted_row_is_busy() {
        let (mut view, a_id, b_id) = loaded_view();
        assert!(view.request_delete(a_id));
        assert_eq!(view.confirm_delete(), Some(a_id));

        let ListDisplay::Table { rows } = view.display(Utc::now()) else {
            panic!("expected a table");
        };
        let busy: Vec<(Uuid, bool)> = rows.iter().map(|r| (r.id, r.busy)).collect();
        assert_eq!(busy, vec![(a_id, true), (b_id, false)]);

        // a busy row cannot be queued again
        assert!(!view.request_delete(a_id));
        assert!(view.request_delete(b_id));
    }

    #[test]
    fn successful_delete_removes_row_locally() {
        let (mut view, a_id, b_id) = loaded_view();
        view.request_delete(a_id);
        view.confirm_delete();
        view.delete_succeeded(a_id);

        assert!(view.deleting.is_empty());
        assert_eq!(view.timers.iter().map(|t| t.id).collect::<Vec<_>>(), vec![b_id]);
    }

    #[test]
    fn failed_delete_keeps_row_and_shows_banner() {
        let (mut view, a_id, _) = loaded_view();
        view.request_delete(a_id);
        view.confirm_delete();
        view.delete_failed(a_id, "Failed to delete timer");

        assert_eq!(view.timers.len(), 2);
        assert!(view.deleting.is_empty());
        assert_eq!(view.error.as_deref(), Some("Failed to delete timer"));

        view.dismiss_error();
        assert_eq!(view.error, None);
    }
}
