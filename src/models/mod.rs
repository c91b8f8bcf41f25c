use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Days between waterings when the caller does not supply an interval.
pub const DEFAULT_WATERING_INTERVAL_DAYS: u32 = 7;
/// Days between fertilizings when the caller does not supply an interval.
pub const DEFAULT_FERTILIZE_INTERVAL_DAYS: u32 = 30;

/// PlantRecord is the sole persisted entity of the catalog.
///
/// Serialized as camelCase JSON inside the `plants` key, matching the
/// layout the web frontend reads. The next-due timestamps are optional on
/// the wire: records persisted by older revisions carry no reminder fields,
/// and such records are simply never due.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantRecord {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub plant_type: String,
    #[serde(default)]
    pub watering_notes: String,
    /// Encoded still image (data-URL text). Immutable once set.
    pub image: String,
    #[serde(default = "default_watering_interval")]
    pub watering_interval_days: u32,
    #[serde(default = "default_fertilize_interval")]
    pub fertilize_interval_days: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_watering_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_fertilize_at: Option<DateTime<Utc>>,
}

fn default_watering_interval() -> u32 {
    DEFAULT_WATERING_INTERVAL_DAYS
}

fn default_fertilize_interval() -> u32 {
    DEFAULT_FERTILIZE_INTERVAL_DAYS
}

impl PlantRecord {
    /// Interval for the given care type, in days.
    pub fn interval_days(&self, care: CareType) -> u32 {
        match care {
            CareType::Watering => self.watering_interval_days,
            CareType::Fertilizing => self.fertilize_interval_days,
        }
    }

    /// Next-due timestamp for the given care type, if one has been computed.
    pub fn next_due_at(&self, care: CareType) -> Option<DateTime<Utc>> {
        match care {
            CareType::Watering => self.next_watering_at,
            CareType::Fertilizing => self.next_fertilize_at,
        }
    }
}

/// The two kinds of care a plant is reminded about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareType {
    Watering,
    Fertilizing,
}

impl std::fmt::Display for CareType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CareType::Watering => write!(f, "watering"),
            CareType::Fertilizing => write!(f, "fertilizing"),
        }
    }
}

/// Field values the UI supplies when adding a plant.
///
/// `name`, `plant_type` and `image` are required; watering notes and the
/// interval overrides are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPlant {
    pub name: String,
    #[serde(rename = "type")]
    pub plant_type: String,
    #[serde(default)]
    pub watering_notes: String,
    pub image: String,
    #[serde(default)]
    pub watering_interval_days: Option<u32>,
    #[serde(default)]
    pub fertilize_interval_days: Option<u32>,
}

/// One entry of the due set: a plant that has crossed its next-due
/// threshold for a single care type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DueItem {
    pub plant_id: i64,
    pub plant_name: String,
    pub care: CareType,
    /// The threshold that was crossed.
    pub due_at: DateTime<Utc>,
}

/// `now + interval` as an absolute timestamp.
pub fn due_after(now: DateTime<Utc>, interval_days: u32) -> DateTime<Utc> {
    now + Duration::days(i64::from(interval_days))
}
