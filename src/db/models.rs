use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One sensor sample as stored in `sensor_readings`.
///
/// `recorded_at` is a wall-clock time of day stamped by the server; it wraps
/// daily, so "latest" is always decided by insertion order, never by this
/// field.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct SensorReading {
    pub id: Uuid,
    /// Degrees Celsius
    pub temperature: f64,
    pub presence: bool,
    pub recorded_at: NaiveTime,
}

/// A reading that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReading {
    pub temperature: f64,
    pub presence: bool,
    pub recorded_at: NaiveTime,
}

/// The preference singleton (`preferences` row with `id = 1`).
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Preferences {
    /// Degrees Celsius. The fan never runs while this is unset.
    pub target_temperature: Option<f64>,
    pub light_start: NaiveTime,
    pub light_end: NaiveTime,
    pub updated_at: DateTime<Utc>,
}

/// Values written by a settings update; `light_end` has already been
/// derived by the schedule resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPreferences {
    pub target_temperature: Option<f64>,
    pub light_start: NaiveTime,
    pub light_end: NaiveTime,
}
