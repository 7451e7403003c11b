//! Domain constants

/// Default slot granularity for availability discretization, in minutes.
pub const DEFAULT_SLOT_DURATION_MINUTES: u32 = 30;

/// Default start of the daily working window, in local hours.
pub const DEFAULT_WORK_START_HOUR: u32 = 9;

/// Default end of the daily working window, in local hours.
pub const DEFAULT_WORK_END_HOUR: u32 = 17;

/// Access tokens expiring within this many seconds are refreshed eagerly,
/// so a token cannot expire mid-request.
pub const TOKEN_REFRESH_SKEW_SECONDS: i64 = 60;

/// Minutes in one calendar day; upper bound for slot durations.
pub const MINUTES_PER_DAY: u32 = 24 * 60;
