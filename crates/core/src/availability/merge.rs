//! Busy-interval merging

use availo_domain::BusyPeriod;
use tracing::warn;

/// Collapse overlapping or touching busy periods into the minimal disjoint
/// set covering the same union of time.
///
/// Output is sorted ascending by start, pairwise disjoint, and
/// non-adjacent: periods that touch exactly (`end == next.start`) merge
/// rather than remaining side by side. Malformed periods (`end < start`)
/// are dropped before the sweep.
pub fn merge(periods: Vec<BusyPeriod>) -> Vec<BusyPeriod> {
    let mut periods: Vec<BusyPeriod> = periods
        .into_iter()
        .filter(|p| {
            if !p.is_well_formed() {
                warn!(start = %p.start, end = %p.end, "dropping busy period with end before start");
                return false;
            }
            true
        })
        .collect();

    periods.sort_by_key(|p| (p.start, p.end));

    let mut merged: Vec<BusyPeriod> = Vec::with_capacity(periods.len());
    for period in periods {
        if let Some(last) = merged.last_mut() {
            if period.start <= last.end {
                last.end = last.end.max(period.end);
                continue;
            }
        }
        merged.push(period);
    }
    merged
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn period(start_hour: u32, start_min: u32, end_hour: u32, end_min: u32) -> BusyPeriod {
        BusyPeriod::new(
            Utc.with_ymd_and_hms(2025, 11, 17, start_hour, start_min, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 11, 17, end_hour, end_min, 0).unwrap(),
        )
    }

    #[test]
    fn empty_input_merges_to_empty() {
        assert_eq!(merge(Vec::new()), Vec::new());
    }

    #[test]
    fn single_period_is_returned_unchanged() {
        let input = vec![period(10, 0, 11, 0)];
        assert_eq!(merge(input.clone()), input);
    }

    #[test]
    fn overlapping_periods_merge() {
        let merged = merge(vec![period(10, 0, 11, 0), period(10, 30, 11, 30)]);
        assert_eq!(merged, vec![period(10, 0, 11, 30)]);
    }

    #[test]
    fn touching_periods_merge() {
        let merged = merge(vec![period(10, 0, 11, 0), period(11, 0, 12, 0)]);
        assert_eq!(merged, vec![period(10, 0, 12, 0)]);
    }

    #[test]
    fn disjoint_periods_stay_separate() {
        let input = vec![period(10, 0, 11, 0), period(14, 0, 15, 0)];
        assert_eq!(merge(input.clone()), input);
    }

    #[test]
    fn unsorted_input_is_sorted_and_merged() {
        let merged = merge(vec![
            period(14, 0, 15, 0),
            period(9, 0, 9, 30),
            period(9, 15, 10, 0),
            period(14, 30, 14, 45),
        ]);
        assert_eq!(merged, vec![period(9, 0, 10, 0), period(14, 0, 15, 0)]);
    }

    #[test]
    fn contained_period_is_absorbed() {
        let merged = merge(vec![period(9, 0, 12, 0), period(10, 0, 10, 30)]);
        assert_eq!(merged, vec![period(9, 0, 12, 0)]);
    }

    #[test]
    fn merge_is_idempotent() {
        let input = vec![
            period(10, 0, 11, 0),
            period(10, 30, 11, 30),
            period(13, 0, 13, 0),
            period(14, 0, 15, 0),
        ];
        let once = merge(input);
        let twice = merge(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn malformed_periods_are_dropped() {
        let backwards = BusyPeriod::new(
            Utc.with_ymd_and_hms(2025, 11, 17, 12, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 11, 17, 11, 0, 0).unwrap(),
        );
        let merged = merge(vec![backwards, period(9, 0, 10, 0)]);
        assert_eq!(merged, vec![period(9, 0, 10, 0)]);
    }

    #[test]
    fn output_is_sorted_disjoint_and_non_touching() {
        let merged = merge(vec![
            period(16, 0, 17, 0),
            period(9, 0, 10, 0),
            period(9, 30, 11, 0),
            period(11, 0, 11, 15),
            period(13, 0, 14, 0),
        ]);

        for pair in merged.windows(2) {
            assert!(pair[0].start <= pair[1].start, "not sorted");
            assert!(pair[0].end < pair[1].start, "adjacent or overlapping periods survived");
        }
    }
}
