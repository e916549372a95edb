use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{NewPreferences, NewReading, Preferences, SensorReading};

/// Process-local storage backend used when no database is configured.
///
/// Wrapped in `Arc` so it can be cheaply cloned into the router state.
/// Uses `tokio::sync::RwLock` so concurrent readers never block each other.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    readings: Vec<SensorReading>,
    preferences: Option<Preferences>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the most recently appended reading, if any.
    pub async fn latest_reading(&self) -> Option<SensorReading> {
        self.inner.read().await.readings.last().cloned()
    }

    pub async fn append_reading(&self, reading: NewReading) -> SensorReading {
        let stored = SensorReading {
            id: Uuid::new_v4(),
            temperature: reading.temperature,
            presence: reading.presence,
            recorded_at: reading.recorded_at,
        };
        self.inner.write().await.readings.push(stored.clone());
        stored
    }

    /// Return up to `limit` of the most recent readings, oldest first.
    pub async fn recent_readings(&self, limit: Option<u32>) -> Vec<SensorReading> {
        let guard = self.inner.read().await;
        let skip = match limit {
            Some(n) => guard.readings.len().saturating_sub(n as usize),
            None => 0,
        };
        guard.readings[skip..].to_vec()
    }

    pub async fn preferences(&self) -> Option<Preferences> {
        self.inner.read().await.preferences.clone()
    }

    /// Overwrite the singleton, or create it. The flag is `true` on creation.
    pub async fn upsert_preferences(&self, prefs: NewPreferences) -> (Preferences, bool) {
        let mut guard = self.inner.write().await;
        let created = guard.preferences.is_none();
        let stored = Preferences {
            target_temperature: prefs.target_temperature,
            light_start: prefs.light_start,
            light_end: prefs.light_end,
            updated_at: Utc::now(),
        };
        guard.preferences = Some(stored.clone());
        (stored, created)
    }
}
