//! IANA timezone resolution and instant-preserving rendering
//!
//! The only place local wall-clock time enters the engine. Day boundaries
//! are interpreted in the caller's zone (a UTC+13 user's "today" is not the
//! UTC "today"), and merged output is rendered with the zone's offset
//! without moving the underlying instants.

use std::str::FromStr;

use availo_domain::{AvailoError, BusyPeriod, Result, ZonedPeriod};
use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Parse an IANA timezone identifier.
///
/// An unknown identifier is caller misconfiguration and surfaces as an
/// error rather than degrading.
pub fn resolve_timezone(name: &str) -> Result<Tz> {
    Tz::from_str(name)
        .map_err(|_| AvailoError::Config(format!("unknown IANA timezone: {name}")))
}

/// Map a local wall-clock datetime into the zone.
///
/// DST fall-back repeats a local hour; the earlier instant wins. A
/// spring-forward gap skips one; the walk resumes at the first valid
/// instant after the jump.
pub fn resolve_local(naive: NaiveDateTime, tz: Tz) -> Result<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        LocalResult::None => {
            let shifted = naive + Duration::hours(1);
            tz.from_local_datetime(&shifted).earliest().ok_or_else(|| {
                AvailoError::Config(format!("cannot resolve local time {naive} in {tz}"))
            })
        }
    }
}

/// First instant of `date` in `tz`, as a UTC instant.
pub fn start_of_day(date: NaiveDate, tz: Tz) -> Result<DateTime<Utc>> {
    let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(|| {
        AvailoError::Internal(format!("cannot derive midnight for {date}"))
    })?;
    Ok(resolve_local(midnight, tz)?.with_timezone(&Utc))
}

/// Last instant of `date` in `tz` (23:59:59.999), as a UTC instant.
pub fn end_of_day(date: NaiveDate, tz: Tz) -> Result<DateTime<Utc>> {
    let end = date.and_hms_milli_opt(23, 59, 59, 999).ok_or_else(|| {
        AvailoError::Internal(format!("cannot derive end of day for {date}"))
    })?;
    Ok(resolve_local(end, tz)?.with_timezone(&Utc))
}

/// Render a merged UTC busy period in `tz` without altering the instants.
pub fn to_zoned(period: &BusyPeriod, tz: Tz) -> ZonedPeriod {
    ZonedPeriod {
        start: period.start.with_timezone(&tz).fixed_offset(),
        end: period.end.with_timezone(&tz).fixed_offset(),
    }
}
