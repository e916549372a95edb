use chrono::{Local, NaiveTime, Timelike};
use tracing::info;

use crate::{
    db::{
        models::{NewReading, SensorReading},
        Store,
    },
    error::ControlResult,
};

/// Ingests readings pushed by the hub device and serves the reading log.
#[derive(Clone)]
pub struct SensorService {
    store: Store,
}

impl SensorService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Append a reading stamped with the current local time of day.
    pub async fn record(&self, temperature: f64, presence: bool) -> ControlResult<SensorReading> {
        self.record_at(temperature, presence, now_time_of_day()).await
    }

    pub async fn record_at(
        &self,
        temperature: f64,
        presence: bool,
        recorded_at: NaiveTime,
    ) -> ControlResult<SensorReading> {
        let reading = self
            .store
            .append_reading(NewReading {
                temperature,
                presence,
                recorded_at,
            })
            .await?;

        info!(
            id = %reading.id,
            temperature = reading.temperature,
            presence = reading.presence,
            recorded_at = %reading.recorded_at,
            "Sensor reading persisted"
        );
        Ok(reading)
    }

    /// Up to `limit` of the newest readings, oldest first; all when `None`.
    pub async fn recent(&self, limit: Option<u32>) -> ControlResult<Vec<SensorReading>> {
        self.store.recent_readings(limit).await
    }
}

/// Wall-clock time of day, truncated to whole seconds.
fn now_time_of_day() -> NaiveTime {
    let now = Local::now().time();
    now.with_nanosecond(0).unwrap_or(now)
}
