use tracing::{debug, info};

use super::{
    evaluator::{self, DeviceStates},
    schedule::{self, format_time_of_day},
};
use crate::{
    db::{
        models::{NewPreferences, Preferences},
        Store,
    },
    error::ControlResult,
    sunset::{SunsetLookup, SunsetSource},
};

/// A settings update as the caller expresses it, before resolution.
#[derive(Debug, Clone)]
pub struct SettingsUpdate {
    pub target_temperature: Option<f64>,
    /// `"HH:MM:SS"` or `"sunset"`.
    pub light: String,
    /// `"1h30m"` style.
    pub light_duration: String,
}

/// Resolves light schedules into the preference singleton and derives
/// output states from it.
#[derive(Clone)]
pub struct ControlService<L = SunsetSource> {
    store: Store,
    sunset: L,
}

impl<L: SunsetLookup> ControlService<L> {
    pub fn new(store: Store, sunset: L) -> Self {
        Self { store, sunset }
    }

    /// Resolve `update` and write it to the singleton. The flag is `true`
    /// when the record did not exist before.
    pub async fn update_settings(&self, update: SettingsUpdate) -> ControlResult<(Preferences, bool)> {
        let resolved =
            schedule::resolve(&update.light, &update.light_duration, &self.sunset).await?;

        let (prefs, created) = self
            .store
            .upsert_preferences(NewPreferences {
                target_temperature: update.target_temperature,
                light_start: resolved.start,
                light_end: resolved.end,
            })
            .await?;

        info!(
            target_temperature = ?prefs.target_temperature,
            light_start = %format_time_of_day(prefs.light_start),
            light_end = %format_time_of_day(prefs.light_end),
            created,
            "Preferences stored"
        );
        Ok((prefs, created))
    }

    /// Current fan and light state, from the latest reading.
    pub async fn device_states(&self) -> ControlResult<DeviceStates> {
        let reading = self.store.latest_reading().await?;
        let prefs = self.store.preferences().await?;
        let states = evaluator::evaluate(reading.as_ref(), prefs.as_ref())?;

        debug!(fan = states.fan, light = states.light, "Device states evaluated");
        Ok(states)
    }
}
