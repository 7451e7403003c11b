//! Slot discretization for a single calendar day
//!
//! Walks one day's working window in local wall-clock steps and tags each
//! slot against the merged busy set. Multi-day ranges are the caller's
//! concern: the service invokes this once per date.

use availo_domain::constants::MINUTES_PER_DAY;
use availo_domain::{AvailoError, BusyPeriod, Result, TimeSlot, WorkHours};
use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;

use super::timezone::resolve_local;

/// Discretize `date`'s working window into fixed-size slots.
///
/// Slots are half-open `[start, end)`. A slot is unavailable iff it
/// overlaps any merged busy period under the strict test
/// `slot_start < busy.end && slot_end > busy.start`; exact boundary
/// touches stay available. The walk emits while the slot start is before
/// the window end, so the final slot may overhang the nominal boundary
/// when the window is not an exact multiple of the slot size.
pub fn generate_slots(
    date: NaiveDate,
    tz: Tz,
    busy_periods: &[BusyPeriod],
    work_hours: WorkHours,
    slot_duration_minutes: u32,
) -> Result<Vec<TimeSlot>> {
    if slot_duration_minutes == 0 || slot_duration_minutes > MINUTES_PER_DAY {
        return Err(AvailoError::InvalidInput(format!(
            "slot duration must be between 1 and {MINUTES_PER_DAY} minutes, got {slot_duration_minutes}"
        )));
    }
    work_hours.validate()?;

    let end_minutes = work_hours.end_hour * 60;
    let mut slots = Vec::new();
    let mut current = work_hours.start_hour * 60;

    while current < end_minutes {
        let slot_start = wall_clock_instant(date, tz, current)?;
        let slot_end = wall_clock_instant(date, tz, current + slot_duration_minutes)?;

        let available = !busy_periods
            .iter()
            .any(|busy| overlaps(slot_start, slot_end, busy));

        slots.push(TimeSlot {
            start: slot_start.fixed_offset(),
            end: slot_end.fixed_offset(),
            available,
        });

        current += slot_duration_minutes;
    }

    Ok(slots)
}

/// Instant for `minutes_from_midnight` of `date` in `tz`, rolling into the
/// next day when the offset passes 24h (end-of-window boundaries).
fn wall_clock_instant(
    date: NaiveDate,
    tz: Tz,
    minutes_from_midnight: u32,
) -> Result<DateTime<Tz>> {
    let days = minutes_from_midnight / MINUTES_PER_DAY;
    let minutes = minutes_from_midnight % MINUTES_PER_DAY;

    let date = date
        .checked_add_days(Days::new(u64::from(days)))
        .ok_or_else(|| AvailoError::Internal(format!("date overflow walking past {date}")))?;
    let time = NaiveTime::from_num_seconds_from_midnight_opt(minutes * 60, 0).ok_or_else(|| {
        AvailoError::Internal(format!("invalid wall-clock minute offset {minutes}"))
    })?;

    resolve_local(date.and_time(time), tz)
}

fn overlaps(slot_start: DateTime<Tz>, slot_end: DateTime<Tz>, busy: &BusyPeriod) -> bool {
    slot_start.with_timezone(&Utc) < busy.end && slot_end.with_timezone(&Utc) > busy.start
}
