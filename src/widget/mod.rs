//! Storefront countdown widget.

pub mod clock;
pub mod countdown;
pub mod ticker;
pub mod view;

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::{client::TimerApiClient, models::timer::Timer};

pub use clock::{Clock, ManualClock, SystemClock};
pub use ticker::Ticker;
pub use view::{WidgetBody, WidgetView, BLINK_KEYFRAMES, KEYFRAMES_STYLE_ID};

/// One widget instance on a storefront page.
///
/// Shows the first timer the public endpoint returns for the shop (and product,
/// when known). The ticker belongs to the selected timer: selecting another timer
/// or unmounting drops it, which aborts its task.
pub struct CountdownWidget {
    client: TimerApiClient,
    shop: String,
    product_id: Option<String>,
    clock: Arc<dyn Clock>,
    selected: Option<(Timer, Ticker)>,
}

impl CountdownWidget {
    pub fn new(
        client: TimerApiClient,
        shop: impl Into<String>,
        product_id: Option<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            client,
            shop: shop.into(),
            product_id,
            clock,
            selected: None,
        }
    }

    /// Fetches the applicable timers and selects the first. A failed fetch is
    /// logged and leaves the widget empty.
    pub async fn mount(&mut self) -> Option<&Timer> {
        let first = match self
            .client
            .public_timers(&self.shop, self.product_id.as_deref())
            .await
        {
            Ok(timers) => timers.into_iter().next(),
            Err(e) => {
                warn!("Error fetching timer for {}: {}", self.shop, e);
                None
            }
        };
        self.select(first);
        self.timer()
    }

    /// Replaces the displayed timer. The previous ticker is stopped before the
    /// new one starts.
    pub fn select(&mut self, timer: Option<Timer>) {
        self.selected = None;
        if let Some(timer) = timer {
            debug!("Countdown widget showing timer {}", timer.id);
            let ticker = Ticker::start(timer.end_at, self.clock.clone());
            self.selected = Some((timer, ticker));
        }
    }

    pub fn unmount(&mut self) {
        self.selected = None;
    }

    pub fn timer(&self) -> Option<&Timer> {
        self.selected.as_ref().map(|(timer, _)| timer)
    }

    pub fn remaining(&self) -> Option<u64> {
        self.selected.as_ref().map(|(_, ticker)| ticker.remaining())
    }

    pub fn subscribe(&self) -> Option<watch::Receiver<u64>> {
        self.selected.as_ref().map(|(_, ticker)| ticker.subscribe())
    }

    /// Current view computed against the widget's clock rather than the last tick,
    /// so it is exact even between ticks.
    pub fn view(&self) -> Option<WidgetView> {
        let (timer, _) = self.selected.as_ref()?;
        let remaining = countdown::remaining_seconds(timer.end_at, self.clock.now());
        Some(WidgetView::compute(timer, remaining))
    }

    /// HTML for the mount point; empty when there is no timer to show.
    pub fn render_html(&self) -> String {
        self.view().map(|view| view.to_html()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::models::timer::{TimerPosition, TimerSize, UrgencyStyle};

    fn timer(end_in: Duration) -> Timer {
        let now = Utc::now();
        Timer {
            id: Uuid::new_v4(),
            shop: "demo-shop.myshopify.com".into(),
            product_id: None,
            name: "Flash Sale".into(),
            promotion: None,
            start_at: now,
            end_at: now + end_in,
            color: "rgb(0,255,0)".into(),
            size: TimerSize::Medium,
            position: TimerPosition::Top,
            urgency: Some(UrgencyStyle::Blink),
            created_at: now,
            updated_at: now,
        }
    }

    fn widget(clock: Arc<dyn Clock>) -> CountdownWidget {
        // never contacted in these tests
        let client = TimerApiClient::new("http://127.0.0.1:9");
        CountdownWidget::new(client, "demo-shop.myshopify.com", None, clock)
    }

    #[tokio::test]
    async fn renders_nothing_without_a_timer() {
        let w = widget(Arc::new(SystemClock));
        assert!(w.view().is_none());
        assert_eq!(w.render_html(), "");
        assert_eq!(w.remaining(), None);
    }

    #[tokio::test]
    async fn reselecting_stops_the_previous_ticker() {
        let mut w = widget(Arc::new(SystemClock));
        w.select(Some(timer(Duration::hours(1))));
        let mut old = w.subscribe().unwrap();

        w.select(Some(timer(Duration::hours(2))));
        let closed = tokio::time::timeout(std::time::Duration::from_secs(5), async {
            while old.changed().await.is_ok() {}
        })
        .await;
        assert!(closed.is_ok());
        assert!(w.remaining().unwrap() > 3600);
    }

    #[tokio::test]
    async fn view_switches_to_expired_when_clock_passes_end() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let mut w = widget(clock.clone());
        let t = timer(Duration::minutes(10));
        clock.set(t.start_at);
        w.select(Some(t));

        assert_eq!(w.view().unwrap().body, WidgetBody::Countdown { remaining: "00:10:00".into(), hurry: false });

        clock.advance(Duration::minutes(6));
        let urgent = w.view().unwrap();
        assert!(urgent.urgent);
        assert_eq!(urgent.timer_style.get("animation"), Some("timer-blink 1s steps(1) infinite"));
        assert!(w.render_html().contains(BLINK_KEYFRAMES));

        clock.advance(Duration::minutes(5));
        assert_eq!(w.view().unwrap().body, WidgetBody::Expired);
        assert!(w.render_html().contains("Offer expired"));
    }
}
