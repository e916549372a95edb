use anyhow::{anyhow, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};
use sunrise::{Coordinates, SolarDay, SolarEvent};

use super::to_server_local;

/// Offline sunset provider: computes the sunset for a fixed coordinate with
/// the NOAA-style solar equations of the `sunrise` crate.
#[derive(Debug, Clone, Copy)]
pub struct SolarSunset {
    latitude: f64,
    longitude: f64,
}

impl SolarSunset {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Sunset instant on `date` at this coordinate.
    pub fn sunset_utc_on(&self, date: NaiveDate) -> Result<DateTime<Utc>> {
        let coord = Coordinates::new(self.latitude, self.longitude).ok_or_else(|| {
            anyhow!(
                "invalid coordinate ({}, {})",
                self.latitude,
                self.longitude
            )
        })?;
        Ok(SolarDay::new(coord, date).event_time(SolarEvent::Sunset))
    }

    /// Today's sunset in server-local time, whole seconds.
    pub fn sunset_today(&self) -> Result<NaiveTime> {
        let today = Local::now().date_naive();
        Ok(to_server_local(self.sunset_utc_on(today)?))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Timelike;

    use super::*;

    #[test]
    fn kingston_midsummer_sunset_is_early_evening_local() {
        // Kingston, Jamaica is UTC-5 all year; sunset on 21 June is ~18:40 local.
        let solar = SolarSunset::new(17.97787, -76.77339);
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        let sunset = solar.sunset_utc_on(date).unwrap();

        assert_eq!(sunset.hour(), 23);
        assert!((20..=59).contains(&sunset.minute()), "got {sunset}");
    }

    #[test]
    fn out_of_range_coordinate_errors() {
        let solar = SolarSunset::new(95.0, 0.0);
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        assert!(solar.sunset_utc_on(date).is_err());
    }

    #[test]
    fn sunset_today_has_no_fractional_seconds() {
        let solar = SolarSunset::new(17.97787, -76.77339);
        let t = solar.sunset_today().unwrap();
        assert_eq!(t.nanosecond(), 0);
    }
}
