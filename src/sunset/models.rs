use anyhow::{anyhow, Context};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Response envelope
//
// api.sunrisesunset.io wraps every answer in the same outer object:
//
//   { "results": { "date": "2024-06-21", "sunrise": "6:39:12 AM",
//                  "sunset": "5:43:10 PM", "timezone": "America/Jamaica", ... },
//     "status": "OK" }
//
// Times are 12-hour clock strings on the wall clock of `timezone`, the zone
// of the coordinate, not of the caller. Polar day/night answers carry `null`
// in place of a time.
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SunsetApiResponse {
    pub results: Option<SunTimes>,
    /// `"OK"` on success.
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct SunTimes {
    /// `YYYY-MM-DD` in `timezone`.
    pub date: Option<String>,
    pub sunset: Option<String>,
    /// IANA zone the times are expressed in.
    pub timezone: Option<String>,
}

impl SunsetApiResponse {
    /// The sunset instant described by the response.
    pub fn into_sunset(self) -> anyhow::Result<DateTime<Utc>> {
        if self.status != "OK" {
            return Err(anyhow!("sunset API status: {}", self.status));
        }
        let results = self
            .results
            .ok_or_else(|| anyhow!("sunset API response has no results"))?;

        let sunset = results
            .sunset
            .as_deref()
            .ok_or_else(|| anyhow!("sunset API response has no sunset time"))
            .and_then(to_24_hour)?;

        let zone = results
            .timezone
            .as_deref()
            .ok_or_else(|| anyhow!("sunset API response has no timezone"))?;
        let zone: Tz = zone
            .parse()
            .map_err(|e| anyhow!("unknown sunset API timezone {zone:?}: {e}"))?;

        let date = match results.date.as_deref() {
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .with_context(|| format!("unrecognised sunset date {raw:?}"))?,
            None => Utc::now().with_timezone(&zone).date_naive(),
        };

        zone.from_local_datetime(&date.and_time(sunset))
            .earliest()
            .map(|t| t.with_timezone(&Utc))
            .ok_or_else(|| anyhow!("sunset {date} {sunset} does not exist in {zone}"))
    }
}

/// Normalize `"6:21:32 PM"` (or an already 24-hour `"18:21:32"`) to a
/// time of day.
pub fn to_24_hour(raw: &str) -> anyhow::Result<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%I:%M:%S %p")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .with_context(|| format!("unrecognised sunset time {raw:?}"))
}
