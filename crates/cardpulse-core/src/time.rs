//! Timestamp normalisation and text encoding.
//!
//! Snapshot timestamps carry no zone; they are handled as [`NaiveDateTime`]
//! everywhere.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};

use crate::{Error, Result};

/// Text layouts accepted by [`parse_timestamp`], tried in order.
const DATETIME_FORMATS: &[&str] = &[
  "%Y-%m-%dT%H:%M:%S%.f",
  "%Y-%m-%d %H:%M:%S%.f",
  "%Y-%m-%dT%H:%M",
  "%Y-%m-%d %H:%M",
];

/// Canonical text form used in chart payloads and the layout.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Round `dt` to the nearest whole minute.
///
/// Exactly half a minute rounds to the even minute, so `00:01:30` becomes
/// `00:02` and `00:02:30` stays `00:02`.
pub fn round_to_minute(dt: NaiveDateTime) -> NaiveDateTime {
  let floor = dt
    .with_nanosecond(0)
    .and_then(|d| d.with_second(0))
    .unwrap_or(dt);
  let half = TimeDelta::seconds(30);

  let round_up = match (dt - floor).cmp(&half) {
    Ordering::Less => false,
    Ordering::Greater => true,
    Ordering::Equal => floor.minute() % 2 == 1,
  };

  if round_up { floor + TimeDelta::minutes(1) } else { floor }
}

/// Parse a timestamp from text.
///
/// Accepts ISO-8601 date-times with a `T` or space separator and optional
/// seconds/fraction, RFC 3339 with an offset (converted to UTC), and bare
/// dates, which mean midnight of that day.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
  let s = s.trim();

  for fmt in DATETIME_FORMATS {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
      return Ok(dt);
    }
  }
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Ok(dt.naive_utc());
  }
  if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
    return Ok(date.and_time(NaiveTime::MIN));
  }

  Err(Error::InvalidTimestamp(s.to_owned()))
}

pub fn format_timestamp(dt: NaiveDateTime) -> String {
  dt.format(DISPLAY_FORMAT).to_string()
}
