//! State of the "Create New Timer" form.
//!
//! The form is a plain struct; validation and state transitions are pure
//! functions over it, and [`CreateTimerForm::submit`] drives a submission
//! through the [`TimerApiClient`].

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    client::{ClientError, TimerApiClient},
    models::timer::{CreateTimerRequest, Timer, TimerPosition, TimerSize, UrgencyStyle},
};

pub const NAME_REQUIRED: &str = "Timer name is required.";
pub const DATES_REQUIRED: &str = "Please fill in all start and end date/time fields.";
pub const INVALID_DATE_TIME: &str = "Invalid date or time format.";
pub const END_BEFORE_START: &str = "End date/time must be after start date/time.";

#[derive(thiserror::Error, Debug)]
pub enum FormError {
    /// Local field check; never reaches the network.
    #[error("{0}")]
    Validation(&'static str),
    #[error("A submission is already in progress")]
    AlreadySubmitting,
    #[error(transparent)]
    Request(#[from] ClientError),
}

/// Color as picked in the admin color picker.
/// `hue` is in degrees [0, 360], `saturation` and `brightness` in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsb {
    pub hue: f64,
    pub saturation: f64,
    pub brightness: f64,
}

impl Default for Hsb {
    fn default() -> Self {
        Self {
            hue: 120.0,
            saturation: 1.0,
            brightness: 1.0,
        }
    }
}

/// Converts an HSB color into 8-bit RGB channels.
pub fn hsb_to_rgb(color: Hsb) -> (u8, u8, u8) {
    let hue = color.hue.clamp(0.0, 360.0);
    let saturation = color.saturation.clamp(0.0, 1.0);
    let brightness = color.brightness.clamp(0.0, 1.0);

    let c = brightness * saturation;
    let x = c * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
    let m = brightness - c;

    let (r, g, b) = match hue {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (channel(r), channel(g), channel(b))
}

/// CSS `rgb(r,g,b)` string for an HSB color.
pub fn hsb_to_rgb_string(color: Hsb) -> String {
    let (r, g, b) = hsb_to_rgb(color);
    format!("rgb({r},{g},{b})")
}

/// Combines a `YYYY-MM-DD` date and an `HH:MM` (or `HH:MM:SS`) time, read in
/// `offset`, into an absolute instant. `None` when either part is missing or
/// does not parse.
pub fn combine_date_time(date: Option<&str>, time: Option<&str>, offset: FixedOffset) -> Option<DateTime<Utc>> {
    let date = date.map(str::trim).filter(|d| !d.is_empty())?;
    let time = time.map(str::trim).filter(|t| !t.is_empty())?;

    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let time = NaiveTime::parse_from_str(time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
        .ok()?;

    offset
        .from_local_datetime(&NaiveDateTime::new(date, time))
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimerForm {
    pub name: String,
    pub promotion: String,
    pub start_date: String,
    pub start_time: String,
    pub end_date: String,
    pub end_time: String,
    pub color: Hsb,
    pub size: TimerSize,
    pub position: TimerPosition,
    pub urgency: UrgencyStyle,
    /// Offset of the merchant's local time zone; date/time fields are read in it.
    pub utc_offset_minutes: i32,
    pub error: Option<String>,
    pub submitting: bool,
}

impl Default for CreateTimerForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            promotion: String::new(),
            start_date: String::new(),
            start_time: String::new(),
            end_date: String::new(),
            end_time: String::new(),
            color: Hsb::default(),
            size: TimerSize::Medium,
            position: TimerPosition::Top,
            urgency: UrgencyStyle::ColorPulse,
            utc_offset_minutes: 0,
            error: None,
            submitting: false,
        }
    }
}

fn non_empty(s: &str) -> Option<&str> {
    Some(s).filter(|s| !s.trim().is_empty())
}

impl CreateTimerForm {
    pub fn new(utc_offset_minutes: i32) -> Self {
        Self {
            utc_offset_minutes,
            ..Self::default()
        }
    }

    fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).unwrap_or_else(|| Utc.fix())
    }

    /// Runs the field checks in order and stops at the first failure.
    pub fn validate(&self) -> Result<CreateTimerRequest, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::Validation(NAME_REQUIRED));
        }

        let fields = [&self.start_date, &self.start_time, &self.end_date, &self.end_time];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err(FormError::Validation(DATES_REQUIRED));
        }

        let offset = self.offset();
        let start_at = combine_date_time(non_empty(&self.start_date), non_empty(&self.start_time), offset);
        let end_at = combine_date_time(non_empty(&self.end_date), non_empty(&self.end_time), offset);
        let (Some(start_at), Some(end_at)) = (start_at, end_at) else {
            return Err(FormError::Validation(INVALID_DATE_TIME));
        };

        if start_at >= end_at {
            return Err(FormError::Validation(END_BEFORE_START));
        }

        Ok(CreateTimerRequest {
            name: Some(name.to_owned()),
            promotion: non_empty(&self.promotion).map(str::to_owned),
            product_id: None,
            start_at: Some(start_at),
            end_at: Some(end_at),
            color: Some(hsb_to_rgb_string(self.color)),
            size: Some(self.size),
            position: Some(self.position),
            urgency: Some(self.urgency),
        })
    }

    /// Validates and marks the form as submitting. On a validation failure the
    /// message is stored in `error` and nothing is sent.
    pub fn begin_submit(&mut self) -> Result<CreateTimerRequest, FormError> {
        if self.submitting {
            return Err(FormError::AlreadySubmitting);
        }
        match self.validate() {
            Ok(request) => {
                self.error = None;
                self.submitting = true;
                Ok(request)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Clears every field back to its default, keeping the time zone.
    pub fn submit_succeeded(&mut self) {
        *self = Self::new(self.utc_offset_minutes);
    }

    pub fn submit_failed(&mut self, message: impl Into<String>) {
        self.submitting = false;
        self.error = Some(message.into());
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn submit_label(&self) -> &'static str {
        if self.submitting {
            "Creating..."
        } else {
            "Create timer"
        }
    }

    pub async fn submit(&mut self, client: &TimerApiClient) -> Result<Timer, FormError> {
        let request = self.begin_submit()?;
        match client.create_timer(&request).await {
            Ok(timer) => {
                info!("Timer created: {} ({})", timer.name, timer.id);
                self.submit_succeeded();
                Ok(timer)
            }
            Err(e) => {
                warn!("Timer creation failed: {}", e);
                self.submit_failed(e.to_string());
                Err(e.into())
            }
        }
    }
}
