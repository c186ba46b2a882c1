//! What the widget shows for one timer at one instant.
//!
//! Everything here is derived from `(timer, remaining seconds)`; nothing is stored.

use std::fmt::Write as _;

use serde::Serialize;

use super::countdown::{format_countdown, is_urgent};
use crate::models::timer::{Timer, TimerPosition, TimerSize, UrgencyStyle};

pub const FALLBACK_COLOR: &str = "rgb(0, 200, 0)";
pub const EXPIRED_MESSAGE: &str = "Offer expired";
pub const HURRY_MARKER: &str = "\u{26a1} Hurry!";

/// Keyframes referenced by the Blink urgency style.
pub const BLINK_KEYFRAMES: &str = "@keyframes timer-blink { 50% { opacity: 0; } }";

/// Id of the `<style>` element carrying [`BLINK_KEYFRAMES`]; a page needs only one.
pub const KEYFRAMES_STYLE_ID: &str = "countdown-timer-widget-style";

/// Ordered list of CSS declarations.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Style(Vec<(&'static str, String)>);

impl Style {
    fn set(&mut self, property: &'static str, value: impl Into<String>) {
        self.0.push((property, value.into()));
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn to_css(&self) -> String {
        let mut css = String::new();
        for (i, (property, value)) in self.0.iter().enumerate() {
            if i > 0 {
                css.push(' ');
            }
            let _ = write!(css, "{property}: {value};");
        }
        css
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum WidgetBody {
    Countdown { remaining: String, hurry: bool },
    Expired,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetView {
    pub container_style: Style,
    pub timer_style: Style,
    pub promotion: Option<String>,
    pub urgent: bool,
    pub body: WidgetBody,
}

fn font_size(size: TimerSize) -> &'static str {
    match size {
        TimerSize::Small => "1rem",
        TimerSize::Medium => "2rem",
        TimerSize::Large => "3rem",
    }
}

fn placement(position: TimerPosition) -> (&'static str, &'static str) {
    match position {
        TimerPosition::Top => ("margin-bottom", "1.5rem"),
        TimerPosition::Bottom => ("margin-top", "1.5rem"),
        TimerPosition::AboveButton => ("margin-bottom", "1rem"),
        TimerPosition::BelowImage => ("margin-top", "2rem"),
    }
}

/// Keeps stored colors from breaking out of the style attribute.
fn sanitize_color(color: &str) -> &str {
    let color = color.trim();
    let safe = !color.is_empty()
        && color.len() <= 64
        && color
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '#' | '(' | ')' | ',' | '.' | '%' | ' '));
    if safe {
        color
    } else {
        FALLBACK_COLOR
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

impl WidgetView {
    pub fn compute(timer: &Timer, remaining: u64) -> Self {
        let color = sanitize_color(&timer.color);
        let urgent = is_urgent(remaining);
        let urgency = timer.urgency.filter(|_| urgent);

        let mut container_style = Style::default();
        let (property, value) = placement(timer.position);
        container_style.set(property, value);

        let mut timer_style = Style::default();
        timer_style.set("font-size", font_size(timer.size));
        timer_style.set("font-weight", "bold");
        timer_style.set("padding", "0.5em 1em");
        timer_style.set("border-radius", "5px");
        timer_style.set(
            "background",
            if urgency == Some(UrgencyStyle::Banner) {
                "orange"
            } else {
                "rgba(255,255,255,0.9)"
            },
        );
        timer_style.set("color", color);
        timer_style.set(
            "border",
            if urgent {
                "2px solid red".to_owned()
            } else {
                format!("2px solid {color}")
            },
        );
        match urgency {
            Some(UrgencyStyle::ColorPulse) => timer_style.set("box-shadow", "0 0 10px 3px orange"),
            Some(UrgencyStyle::Blink) => timer_style.set("animation", "timer-blink 1s steps(1) infinite"),
            Some(UrgencyStyle::Banner) | None => {}
        }
        timer_style.set("text-align", "center");
        timer_style.set("transition", "all 0.5s");

        let body = if remaining > 0 {
            WidgetBody::Countdown {
                remaining: format_countdown(remaining),
                hurry: urgency == Some(UrgencyStyle::Banner),
            }
        } else {
            WidgetBody::Expired
        };

        Self {
            container_style,
            timer_style,
            promotion: timer.promotion.clone().filter(|p| !p.trim().is_empty()),
            urgent,
            body,
        }
    }

    pub fn text(&self) -> String {
        match &self.body {
            WidgetBody::Countdown { remaining, hurry: false } => format!("Offer ends in {remaining}"),
            WidgetBody::Countdown { remaining, hurry: true } => format!("Offer ends in {remaining} {HURRY_MARKER}"),
            WidgetBody::Expired => EXPIRED_MESSAGE.to_owned(),
        }
    }

    /// Whether the rendered timer runs the `timer-blink` animation.
    pub fn blinking(&self) -> bool {
        self.timer_style.get("animation").is_some()
    }

    /// HTML fragment for the storefront mount point. A blinking timer carries
    /// its own keyframes so the fragment animates on any page.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        if self.blinking() {
            let _ = write!(html, "<style id=\"{KEYFRAMES_STYLE_ID}\">{BLINK_KEYFRAMES}</style>");
        }
        let _ = write!(
            html,
            "<div style=\"{}\"><div style=\"{}\">",
            escape_html(&self.container_style.to_css()),
            escape_html(&self.timer_style.to_css())
        );
        if let Some(promotion) = &self.promotion {
            let _ = write!(html, "<div style=\"margin-bottom: 8px;\">{}</div>", escape_html(promotion));
        }
        match &self.body {
            WidgetBody::Countdown { remaining, hurry } => {
                let _ = write!(html, "<span>Offer ends in <strong>{remaining}</strong>");
                if *hurry {
                    let _ = write!(html, " <span style=\"margin-left: 8px;\">{HURRY_MARKER}</span>");
                }
                html.push_str("</span>");
            }
            WidgetBody::Expired => {
                let _ = write!(html, "<span>{EXPIRED_MESSAGE}</span>");
            }
        }
        html.push_str("</div></div>");
        html
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use super::*;

    fn timer(urgency: Option<UrgencyStyle>) -> Timer {
        let now = Utc::now();
        Timer {
            id: Uuid::new_v4(),
            shop: "demo-shop.myshopify.com".into(),
            product_id: None,
            name: "Flash Sale".into(),
            promotion: Some("20% off <today>".into()),
            start_at: now,
            end_at: now + Duration::hours(1),
            color: "rgb(0,255,0)".into(),
            size: TimerSize::Large,
            position: TimerPosition::BelowImage,
            urgency,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn calm_countdown_uses_timer_color() {
        let view = WidgetView::compute(&timer(Some(UrgencyStyle::Banner)), 3600);
        assert!(!view.urgent);
        assert_eq!(view.container_style.get("margin-top"), Some("2rem"));
        assert_eq!(view.timer_style.get("font-size"), Some("3rem"));
        assert_eq!(view.timer_style.get("border"), Some("2px solid rgb(0,255,0)"));
        assert_eq!(view.timer_style.get("background"), Some("rgba(255,255,255,0.9)"));
        assert_eq!(view.text(), "Offer ends in 01:00:00");
    }

    #[test]
    fn banner_swaps_background_and_adds_marker_when_urgent() {
        let view = WidgetView::compute(&timer(Some(UrgencyStyle::Banner)), 300);
        assert!(view.urgent);
        assert_eq!(view.timer_style.get("background"), Some("orange"));
        assert_eq!(view.timer_style.get("border"), Some("2px solid red"));
        assert_eq!(view.text(), format!("Offer ends in 00:05:00 {HURRY_MARKER}"));
        assert!(view.to_html().contains(HURRY_MARKER));
    }

    #[test]
    fn pulse_glows_and_blink_animates_only_when_urgent() {
        let pulse = WidgetView::compute(&timer(Some(UrgencyStyle::ColorPulse)), 120);
        assert_eq!(pulse.timer_style.get("box-shadow"), Some("0 0 10px 3px orange"));
        assert_eq!(pulse.timer_style.get("animation"), None);

        let blink = WidgetView::compute(&timer(Some(UrgencyStyle::Blink)), 120);
        assert_eq!(blink.timer_style.get("animation"), Some("timer-blink 1s steps(1) infinite"));

        let calm = WidgetView::compute(&timer(Some(UrgencyStyle::Blink)), 301);
        assert_eq!(calm.timer_style.get("animation"), None);
    }

    #[test]
    fn urgent_blink_html_defines_its_keyframes() {
        let html = WidgetView::compute(&timer(Some(UrgencyStyle::Blink)), 120).to_html();
        assert!(html.contains("animation: timer-blink 1s steps(1) infinite"));
        assert!(html.starts_with(&format!("<style id=\"{KEYFRAMES_STYLE_ID}\">")));
        assert!(html.contains("@keyframes timer-blink"));

        let calm = WidgetView::compute(&timer(Some(UrgencyStyle::Blink)), 3600).to_html();
        assert!(!calm.contains("<style"));
        let banner = WidgetView::compute(&timer(Some(UrgencyStyle::Banner)), 120).to_html();
        assert!(!banner.contains("@keyframes"));
    }

    #[test]
    fn zero_remaining_renders_expired() {
        let view = WidgetView::compute(&timer(Some(UrgencyStyle::Banner)), 0);
        assert_eq!(view.body, WidgetBody::Expired);
        assert_eq!(view.text(), EXPIRED_MESSAGE);
        assert!(view.to_html().contains("<span>Offer expired</span>"));
    }

    #[test]
    fn html_escapes_promotion_and_rejects_unsafe_colors() {
        let mut t = timer(None);
        t.color = "red\" onmouseover=\"alert(1)".into();
        let view = WidgetView::compute(&t, 3600);
        assert_eq!(view.timer_style.get("color"), Some(FALLBACK_COLOR));

        let html = view.to_html();
        assert!(html.contains("20% off &lt;today&gt;"));
        assert!(!html.contains("onmouseover"));
    }
}
