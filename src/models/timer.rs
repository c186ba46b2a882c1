use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const DEFAULT_COLOR: &str = "#00ff00";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl TimerSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerSize::Small => "Small",
            TimerSize::Medium => "Medium",
            TimerSize::Large => "Large",
        }
    }
}

impl std::str::FromStr for TimerSize {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Small" => Ok(TimerSize::Small),
            "Medium" => Ok(TimerSize::Medium),
            "Large" => Ok(TimerSize::Large),
            _ => Err(anyhow::anyhow!("Unknown timer size: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerPosition {
    #[default]
    Top,
    Bottom,
    AboveButton,
    BelowImage,
}

impl TimerPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerPosition::Top => "Top",
            TimerPosition::Bottom => "Bottom",
            TimerPosition::AboveButton => "AboveButton",
            TimerPosition::BelowImage => "BelowImage",
        }
    }
}

impl std::str::FromStr for TimerPosition {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Top" => Ok(TimerPosition::Top),
            "Bottom" => Ok(TimerPosition::Bottom),
            "AboveButton" => Ok(TimerPosition::AboveButton),
            "BelowImage" => Ok(TimerPosition::BelowImage),
            _ => Err(anyhow::anyhow!("Unknown timer position: {s}")),
        }
    }
}

/// Visual treatment applied once the countdown enters its last five minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UrgencyStyle {
    #[default]
    #[serde(rename = "Color pulse", alias = "ColorPulse")]
    ColorPulse,
    Banner,
    Blink,
}

impl UrgencyStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyStyle::ColorPulse => "Color pulse",
            UrgencyStyle::Banner => "Banner",
            UrgencyStyle::Blink => "Blink",
        }
    }
}

impl std::str::FromStr for UrgencyStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Color pulse" | "ColorPulse" => Ok(UrgencyStyle::ColorPulse),
            "Banner" => Ok(UrgencyStyle::Banner),
            "Blink" => Ok(UrgencyStyle::Blink),
            _ => Err(anyhow::anyhow!("Unknown urgency style: {s}")),
        }
    }
}

/// A countdown timer as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timer {
    pub id: Uuid,
    pub shop: String,
    pub product_id: Option<String>,
    #[serde(rename = "timerName")]
    pub name: String,
    pub promotion: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub color: String,
    #[serde(rename = "timerSize")]
    pub size: TimerSize,
    #[serde(rename = "timerPosition")]
    pub position: TimerPosition,
    pub urgency: Option<UrgencyStyle>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DB row struct; enum columns are stored as TEXT and parsed into [`Timer`].
#[derive(Debug, Clone, FromRow)]
pub struct TimerRow {
    pub id: Uuid,
    pub shop: String,
    pub product_id: Option<String>,
    pub name: String,
    pub promotion: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub color: String,
    pub size: String,
    pub position: String,
    pub urgency: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<TimerRow> for Timer {
    type Error = anyhow::Error;

    fn try_from(row: TimerRow) -> Result<Self, Self::Error> {
        Ok(Timer {
            id: row.id,
            shop: row.shop,
            product_id: row.product_id,
            name: row.name,
            promotion: row.promotion,
            start_at: row.start_at,
            end_at: row.end_at,
            color: row.color,
            size: row.size.parse()?,
            position: row.position.parse()?,
            urgency: row.urgency.as_deref().map(str::parse).transpose()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Body of `POST /api/timers`.
///
/// Every field is optional at the wire level so that missing required fields
/// surface as validation errors rather than JSON rejections. A `shop` field in
/// the body is ignored; the shop always comes from the session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimerRequest {
    #[serde(rename = "timerName", alias = "name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(alias = "promotionText", default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(rename = "timerSize", alias = "size", default, skip_serializing_if = "Option::is_none")]
    pub size: Option<TimerSize>,
    #[serde(rename = "timerPosition", alias = "position", default, skip_serializing_if = "Option::is_none")]
    pub position: Option<TimerPosition>,
    #[serde(alias = "urgencyStyle", default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<UrgencyStyle>,
}

/// Maps a present field to `Some`, so an explicit `null` becomes `Some(None)`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Body of `PUT /api/timers/{id}`. Absent fields are left untouched; the
/// optional attributes (`productId`, `promotion`, `urgency`) are cleared by an
/// explicit `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTimerRequest {
    #[serde(rename = "timerName", alias = "name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(alias = "promotionText", default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub promotion: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub product_id: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(rename = "timerSize", alias = "size", default, skip_serializing_if = "Option::is_none")]
    pub size: Option<TimerSize>,
    #[serde(rename = "timerPosition", alias = "position", default, skip_serializing_if = "Option::is_none")]
    pub position: Option<TimerPosition>,
    #[serde(alias = "urgencyStyle", default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub urgency: Option<Option<UrgencyStyle>>,
}

/// A validated timer ready to be persisted. The store stamps shop, id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTimer {
    pub product_id: Option<String>,
    pub name: String,
    pub promotion: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub color: String,
    pub size: TimerSize,
    pub position: TimerPosition,
    pub urgency: Option<UrgencyStyle>,
}

/// Fields to merge into an existing timer. `None` leaves the stored value
/// untouched; `Some(None)` clears an optional attribute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimerPatch {
    pub product_id: Option<Option<String>>,
    pub name: Option<String>,
    pub promotion: Option<Option<String>>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub color: Option<String>,
    pub size: Option<TimerSize>,
    pub position: Option<TimerPosition>,
    pub urgency: Option<Option<UrgencyStyle>>,
}

impl TimerPatch {
    pub fn apply_to(self, timer: &mut Timer) {
        if let Some(v) = self.product_id {
            timer.product_id = v;
        }
        if let Some(v) = self.name {
            timer.name = v;
        }
        if let Some(v) = self.promotion {
            timer.promotion = v;
        }
        if let Some(v) = self.start_at {
            timer.start_at = v;
        }
        if let Some(v) = self.end_at {
            timer.end_at = v;
        }
        if let Some(v) = self.color {
            timer.color = v;
        }
        if let Some(v) = self.size {
            timer.size = v;
        }
        if let Some(v) = self.position {
            timer.position = v;
        }
        if let Some(v) = self.urgency {
            timer.urgency = v;
        }
    }
}

/// Query string of `GET /api/public/timers`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublicTimerQuery {
    pub shop: Option<String>,
    #[serde(rename = "productId")]
    pub product_id: Option<String>,
}
