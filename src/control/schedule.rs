use chrono::{Duration, NaiveTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::{
    error::{ControlError, ControlResult},
    sunset::SunsetLookup,
};

/// Light-setting token that defers the start time to today's sunset.
pub const SUNSET_TOKEN: &str = "sunset";

/// Wire format for every time of day the hub stores or returns.
pub const TIME_FORMAT: &str = "%H:%M:%S";

static DURATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:(\d+)h)?(?:(\d+)m)?(?:(\d+)s)?$").expect("valid regex"));

/// A concrete light interval. `start == end` is empty; `start > end` wraps
/// past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightSchedule {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// Parse `"1h30m"`, `"45s"`, `"2h15m10s"` and friends.
///
/// Every component is optional but at least one must be present, and the
/// whole string must match.
pub fn parse_duration(raw: &str) -> ControlResult<Duration> {
    let invalid = || ControlError::InvalidDurationFormat(raw.to_owned());

    let caps = DURATION_RE.captures(raw.trim()).ok_or_else(invalid)?;
    if caps.iter().skip(1).all(|g| g.is_none()) {
        return Err(invalid());
    }

    let component = |idx: usize| -> ControlResult<i64> {
        caps.get(idx)
            .map(|m| m.as_str().parse::<i64>().map_err(|_| invalid()))
            .unwrap_or(Ok(0))
    };
    let (hours, minutes, seconds) = (component(1)?, component(2)?, component(3)?);

    Duration::try_hours(hours)
        .zip(Duration::try_minutes(minutes))
        .zip(Duration::try_seconds(seconds))
        .and_then(|((h, m), s)| h.checked_add(&m)?.checked_add(&s))
        .ok_or_else(invalid)
}

/// Parse a literal `"HH:MM:SS"` token. Leap seconds (`:60`) are rejected.
pub fn parse_time_of_day(token: &str) -> ControlResult<NaiveTime> {
    NaiveTime::parse_from_str(token.trim(), TIME_FORMAT)
        .ok()
        .filter(|t| t.nanosecond() < 1_000_000_000)
        .ok_or_else(|| ControlError::InvalidTimeFormat(token.to_owned()))
}

/// Render a time of day as `"HH:MM:SS"`.
pub fn format_time_of_day(t: NaiveTime) -> String {
    t.format(TIME_FORMAT).to_string()
}

/// `start + duration`, wrapped modulo 24 hours.
pub fn add_wrapping(start: NaiveTime, duration: Duration) -> NaiveTime {
    let (end, _wrapped_days) = start.overflowing_add_signed(duration);
    end
}

/// Turn a light-setting token and a duration into a concrete interval.
///
/// `"sunset"` asks `sunset` for today's sunset; anything else must be a
/// `"HH:MM:SS"` time. The duration is validated before any lookup so a bad
/// request never reaches the network.
pub async fn resolve<L: SunsetLookup>(
    token: &str,
    duration: &str,
    sunset: &L,
) -> ControlResult<LightSchedule> {
    let duration = parse_duration(duration)?;

    let start = if token.trim() == SUNSET_TOKEN {
        sunset.sunset_time().await?
    } else {
        parse_time_of_day(token)?
    };
    let start = start.with_nanosecond(0).unwrap_or(start);
    let end = add_wrapping(start, duration);

    debug!(
        start = %format_time_of_day(start),
        end = %format_time_of_day(end),
        "Light schedule resolved"
    );
    Ok(LightSchedule { start, end })
}
