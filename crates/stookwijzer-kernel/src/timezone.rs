//! Civil-time conversion for the advisory's fixed time zone.
//!
//! The geodata source publishes its model runtime as a bare wall-clock string
//! (`dd-mm-yyyy hh:mm`) in Dutch civil time. Turning that into an absolute
//! instant takes one offset lookup:
//!
//! 1. Treat the wall-clock fields as if they were UTC (the provisional instant).
//! 2. Look up the zone's UTC offset at the provisional instant.
//! 3. Subtract that offset.
//!
//! This is a single-iteration approximation. It is exact everywhere except
//! within the hour around a DST transition, where the provisional instant and
//! the true instant can straddle the switch. That hour is a known limitation.

use chrono::{NaiveDate, NaiveTime, TimeDelta};
use chrono_tz::Tz;
use stookwijzer_types::Instant;

/// The zone every model runtime is expressed in.
pub const ADVISORY_ZONE: Tz = chrono_tz::Europe::Amsterdam;

/// Parses a `dd-mm-yyyy hh:mm` Amsterdam wall-clock string.
///
/// Returns `None` when the text does not have exactly that shape (one or more
/// whitespace characters between date and time, nothing before or after), or
/// when the fields do not name a real calendar date and time.
pub fn parse_wall_clock(text: &str) -> Option<Instant> {
    let (date, time) = split_fields(text)?;
    let provisional = date.and_time(time).and_utc();
    let offset = offset_minutes(provisional, ADVISORY_ZONE);
    Some(provisional - TimeDelta::minutes(i64::from(offset)))
}

/// Signed minutes between `zone`'s wall clock and UTC at `instant`.
///
/// +60 in CET, +120 in CEST.
pub fn offset_minutes(instant: Instant, zone: Tz) -> i32 {
    let wall = instant.with_timezone(&zone).naive_local();
    (wall - instant.naive_utc()).num_minutes() as i32
}

fn split_fields(text: &str) -> Option<(NaiveDate, NaiveTime)> {
    let (date, time) = text.split_once(char::is_whitespace)?;
    let time = time.trim_start_matches(char::is_whitespace);

    let mut date_parts = date.split('-');
    let day = digits(date_parts.next()?, 2)?;
    let month = digits(date_parts.next()?, 2)?;
    let year = digits(date_parts.next()?, 4)?;
    if date_parts.next().is_some() {
        return None;
    }

    let (hour, minute) = time.split_once(':')?;
    let hour = digits(hour, 2)?;
    let minute = digits(minute, 2)?;

    let date = NaiveDate::from_ymd_opt(year as i32, month, day)?;
    let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
    Some((date, time))
}

/// A run of exactly `width` ASCII digits.
fn digits(field: &str, width: usize) -> Option<u32> {
    if field.len() == width && field.bytes().all(|b| b.is_ascii_digit()) {
        field.parse().ok()
    } else {
        None
    }
}
