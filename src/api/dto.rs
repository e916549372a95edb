use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    control::{evaluator::DeviceStates, schedule::format_time_of_day, SettingsUpdate},
    db::models::{Preferences, SensorReading},
};

/// Request body for `PUT /settings`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SettingsRequest {
    /// Fan threshold in degrees Celsius.
    pub user_temp: Option<f64>,
    /// Light start: `"HH:MM:SS"` or `"sunset"`.
    pub user_light: String,
    /// How long the light stays on, e.g. `"1h30m"`, `"45s"`.
    pub light_duration: String,
}

/// Resolved preference record returned by `PUT /settings`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SettingsDto {
    pub user_temp: Option<f64>,
    /// Resolved light start, `"HH:MM:SS"`.
    pub user_light: String,
    /// Derived light end, `"HH:MM:SS"`.
    pub light_time_off: String,
}

/// Request body for `POST /sensorData`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SensorDataRequest {
    /// Degrees Celsius
    pub temperature: f64,
    pub presence: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SensorDataDto {
    pub id: Uuid,
    /// Degrees Celsius
    pub temperature: f64,
    pub presence: bool,
    /// Server time of day at ingestion, `"HH:MM:SS"`.
    pub datetime: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FanDto {
    pub fan: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LightDto {
    pub light: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeviceStatesDto {
    pub fan: bool,
    pub light: bool,
}

impl From<SettingsRequest> for SettingsUpdate {
    fn from(r: SettingsRequest) -> Self {
        Self {
            target_temperature: r.user_temp,
            light: r.user_light,
            light_duration: r.light_duration,
        }
    }
}

impl From<Preferences> for SettingsDto {
    fn from(p: Preferences) -> Self {
        Self {
            user_temp: p.target_temperature,
            user_light: format_time_of_day(p.light_start),
            light_time_off: format_time_of_day(p.light_end),
        }
    }
}

impl From<SensorReading> for SensorDataDto {
    fn from(r: SensorReading) -> Self {
        Self {
            id: r.id,
            temperature: r.temperature,
            presence: r.presence,
            datetime: format_time_of_day(r.recorded_at),
        }
    }
}

impl From<DeviceStates> for DeviceStatesDto {
    fn from(s: DeviceStates) -> Self {
        Self {
            fan: s.fan,
            light: s.light,
        }
    }
}
