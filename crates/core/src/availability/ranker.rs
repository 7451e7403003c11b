//! Slot suggestion ordering and formatting
//!
//! Thin consumer-facing contract on top of the engine: available slots
//! only, morning suggestions before afternoon ones, stable by start time
//! within each bucket.

use availo_domain::TimeSlot;
use chrono::Timelike;

/// Local wall-clock hour separating morning from afternoon suggestions.
const NOON_HOUR: u32 = 12;

/// Available slots ordered for suggestion: morning before afternoon, each
/// bucket ascending by start.
pub fn rank_slots(slots: &[TimeSlot]) -> Vec<TimeSlot> {
    let mut ranked: Vec<TimeSlot> = slots.iter().filter(|s| s.available).cloned().collect();
    ranked.sort_by_key(|s| (s.start.hour() >= NOON_HOUR, s.start));
    ranked
}

/// Human-readable label for a suggested slot, in the slot's own zone.
pub fn format_slot(slot: &TimeSlot) -> String {
    format!(
        "{} {} - {}",
        slot.start.format("%a, %b %-d"),
        slot.start.format("%-I:%M %p"),
        slot.end.format("%-I:%M %p")
    )
}
