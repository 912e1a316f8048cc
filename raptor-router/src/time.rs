//! Service-day time handling.
//!
//! The router works on plain integer seconds counted from the start of the
//! service day. Times past midnight simply keep counting (`25:10` is a valid
//! service time). This module provides parsing, formatting and the rounding
//! helpers used when search-window parameters are derived.

use std::fmt;

use chrono::{Duration, NaiveTime, Timelike};

/// Seconds since the start of the service day.
pub type Time = i32;

/// A span of time in seconds.
pub type Seconds = i32;

const SECONDS_PER_MINUTE: i32 = 60;
const SECONDS_PER_HOUR: i32 = 3600;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time '{input}': {reason}")]
pub struct TimeError {
    input: String,
    reason: &'static str,
}

impl TimeError {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

/// Parse a time in `HH:MM` or `HH:MM:SS` format into service-day seconds.
///
/// Hours above 23 are accepted for trips running past midnight.
///
/// # Examples
///
/// ```
/// use raptor_router::time::parse_time;
///
/// assert_eq!(parse_time("08:10").unwrap(), 8 * 3600 + 600);
/// assert_eq!(parse_time("25:00").unwrap(), 25 * 3600);
/// assert!(parse_time("8h10").is_err());
/// ```
pub fn parse_time(s: &str) -> Result<Time, TimeError> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 2 && parts.len() != 3 {
        return Err(TimeError::new(s, "expected HH:MM or HH:MM:SS"));
    }

    let hours: i32 = parts[0]
        .parse()
        .map_err(|_| TimeError::new(s, "invalid hour digits"))?;
    if !(0..48).contains(&hours) {
        return Err(TimeError::new(s, "hour must be 0-47"));
    }

    // Minutes and seconds are validated through chrono, the hour is not
    // because service days run past 24:00.
    let rest = if parts.len() == 3 {
        format!("00:{}:{}", parts[1], parts[2])
    } else {
        format!("00:{}:00", parts[1])
    };
    let rest = NaiveTime::parse_from_str(&rest, "%H:%M:%S")
        .map_err(|_| TimeError::new(s, "invalid minute or second digits"))?;

    Ok(hours * SECONDS_PER_HOUR + rest.minute() as i32 * SECONDS_PER_MINUTE + rest.second() as i32)
}

/// Parse a whitespace separated list of times, e.g. `"10:00 10:10 10:20"`.
pub fn parse_times(s: &str) -> Result<Vec<Time>, TimeError> {
    s.split_whitespace().map(parse_time).collect()
}

/// Round down to the nearest whole minute.
pub fn round_down_to_minute(time: Time) -> Time {
    time.div_euclid(SECONDS_PER_MINUTE) * SECONDS_PER_MINUTE
}

/// Round up to the nearest multiple of `step` seconds.
///
/// A non-positive step leaves the value untouched.
pub fn round_up_to_step(value: Seconds, step: Seconds) -> Seconds {
    if step <= 0 {
        return value;
    }
    -((-value).div_euclid(step)) * step
}

/// Convert a chrono duration to whole seconds, saturating at the `i32` range.
pub fn seconds_of(duration: Duration) -> Seconds {
    duration
        .num_seconds()
        .clamp(i32::MIN as i64, i32::MAX as i64) as Seconds
}

/// Display wrapper printing a service time as `HH:MM` (or `HH:MM:SS`).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ServiceTime(pub Time);

impl fmt::Display for ServiceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let t = self.0.abs();
        let (h, m, s) = (
            t / SECONDS_PER_HOUR,
            (t % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE,
            t % SECONDS_PER_MINUTE,
        );
        if s == 0 {
            write!(f, "{sign}{h:02}:{m:02}")
        } else {
            write!(f, "{sign}{h:02}:{m:02}:{s:02}")
        }
    }
}

impl fmt::Debug for ServiceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceTime({self})")
    }
}
