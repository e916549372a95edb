use chrono::NaiveTime;
use serde::Serialize;

use crate::{
    db::models::{Preferences, SensorReading},
    error::{ControlError, ControlResult},
};

/// Derived on/off state of the hub's outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceStates {
    pub fan: bool,
    pub light: bool,
}

/// Fan runs while someone is present and it is at least as warm as the
/// target. No target, no fan.
pub fn fan_on(reading: &SensorReading, prefs: &Preferences) -> bool {
    reading.presence
        && prefs
            .target_temperature
            .is_some_and(|target| reading.temperature >= target)
}

/// Light is on while someone is present and the reading's time of day falls
/// strictly inside the scheduled interval.
pub fn light_on(reading: &SensorReading, prefs: &Preferences) -> bool {
    reading.presence && within_schedule(reading.recorded_at, prefs.light_start, prefs.light_end)
}

/// Open-interval membership on a 24-hour clock. `start > end` means the
/// interval runs through midnight.
pub fn within_schedule(t: NaiveTime, start: NaiveTime, end: NaiveTime) -> bool {
    if start <= end {
        start < t && t < end
    } else {
        t > start || t < end
    }
}

/// Evaluate both outputs from the latest reading and the stored preferences.
pub fn evaluate(
    reading: Option<&SensorReading>,
    prefs: Option<&Preferences>,
) -> ControlResult<DeviceStates> {
    let reading = reading.ok_or(ControlError::NoDataAvailable("no sensor readings recorded yet"))?;
    let prefs = prefs.ok_or(ControlError::NoDataAvailable("no preferences configured yet"))?;

    Ok(DeviceStates {
        fan: fan_on(reading, prefs),
        light: light_on(reading, prefs),
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    fn hms(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    fn make_reading(temperature: f64, presence: bool, at: NaiveTime) -> SensorReading {
        SensorReading {
            id: Uuid::new_v4(),
            temperature,
            presence,
            recorded_at: at,
        }
    }

    fn make_prefs(target: Option<f64>, start: NaiveTime, end: NaiveTime) -> Preferences {
        Preferences {
            target_temperature: target,
            light_start: start,
            light_end: end,
            updated_at: Utc::now(),
        }
    }

    fn afternoon_prefs(target: Option<f64>) -> Preferences {
        make_prefs(target, hms(14, 0, 0), hms(16, 0, 0))
    }

    // -----------------------------------------------------------------------
    // fan
    // -----------------------------------------------------------------------

    #[test]
    fn fan_on_when_present_and_warm() {
        let r = make_reading(30.0, true, hms(12, 0, 0));
        assert!(fan_on(&r, &afternoon_prefs(Some(28.0))));
    }

    #[test]
    fn fan_off_when_cooler_than_target() {
        let r = make_reading(25.0, true, hms(12, 0, 0));
        assert!(!fan_on(&r, &afternoon_prefs(Some(28.0))));
    }

    #[test]
    fn fan_on_at_exact_target() {
        let r = make_reading(28.0, true, hms(12, 0, 0));
        assert!(fan_on(&r, &afternoon_prefs(Some(28.0))));
    }

    #[test]
    fn fan_off_when_nobody_present() {
        let r = make_reading(35.0, false, hms(12, 0, 0));
        assert!(!fan_on(&r, &afternoon_prefs(Some(28.0))));
    }

    #[test]
    fn fan_off_without_target() {
        let r = make_reading(35.0, true, hms(12, 0, 0));
        assert!(!fan_on(&r, &afternoon_prefs(None)));
    }

    // -----------------------------------------------------------------------
    // light
    // -----------------------------------------------------------------------

    #[test]
    fn light_on_inside_interval() {
        let r = make_reading(20.0, true, hms(15, 0, 0));
        assert!(light_on(&r, &afternoon_prefs(None)));
    }

    #[test]
    fn light_off_outside_interval() {
        let prefs = afternoon_prefs(None);
        for at in [hms(13, 59, 59), hms(16, 0, 1), hms(3, 0, 0)] {
            assert!(!light_on(&make_reading(20.0, true, at), &prefs), "{at}");
        }
    }

    #[test]
    fn light_interval_bounds_are_exclusive() {
        let prefs = afternoon_prefs(None);
        assert!(!light_on(&make_reading(20.0, true, hms(14, 0, 0)), &prefs));
        assert!(!light_on(&make_reading(20.0, true, hms(16, 0, 0)), &prefs));
    }

    #[test]
    fn light_off_when_nobody_present() {
        let r = make_reading(20.0, false, hms(15, 0, 0));
        assert!(!light_on(&r, &afternoon_prefs(None)));
    }

    #[test]
    fn light_interval_through_midnight() {
        let prefs = make_prefs(None, hms(23, 0, 0), hms(1, 0, 0));
        assert!(light_on(&make_reading(20.0, true, hms(23, 30, 0)), &prefs));
        assert!(light_on(&make_reading(20.0, true, hms(0, 30, 0)), &prefs));
        assert!(!light_on(&make_reading(20.0, true, hms(12, 0, 0)), &prefs));
        assert!(!light_on(&make_reading(20.0, true, hms(1, 0, 0)), &prefs));
    }

    #[test]
    fn empty_interval_never_lights() {
        let prefs = make_prefs(None, hms(18, 0, 0), hms(18, 0, 0));
        for at in [hms(17, 59, 59), hms(18, 0, 0), hms(18, 0, 1)] {
            assert!(!light_on(&make_reading(20.0, true, at), &prefs), "{at}");
        }
    }

    // -----------------------------------------------------------------------
    // evaluate
    // -----------------------------------------------------------------------

    #[test]
    fn evaluate_combines_both_outputs() {
        let r = make_reading(30.0, true, hms(15, 0, 0));
        let states = evaluate(Some(&r), Some(&afternoon_prefs(Some(28.0)))).unwrap();
        assert_eq!(states, DeviceStates { fan: true, light: true });
    }

    #[test]
    fn evaluate_without_readings_is_no_data() {
        let err = evaluate(None, Some(&afternoon_prefs(Some(28.0)))).unwrap_err();
        assert!(matches!(err, ControlError::NoDataAvailable(_)));
    }

    #[test]
    fn evaluate_without_preferences_is_no_data() {
        let r = make_reading(30.0, true, hms(15, 0, 0));
        let err = evaluate(Some(&r), None).unwrap_err();
        assert!(matches!(err, ControlError::NoDataAvailable(_)));
    }
}
