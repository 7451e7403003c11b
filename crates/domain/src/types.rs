//! Common data types used throughout the engine

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_SLOT_DURATION_MINUTES, DEFAULT_WORK_END_HOUR, DEFAULT_WORK_START_HOUR, MINUTES_PER_DAY,
};
use crate::errors::{AvailoError, Result};

/// Calendar backend identifier
///
/// Adding a backend extends this enum; every dispatch site matches
/// exhaustively, so the compiler points at the places that need a new arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Google,
    Microsoft,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Google => f.write_str("google"),
            Self::Microsoft => f.write_str("microsoft"),
        }
    }
}

/// OAuth credentials attached to a calendar connection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthCredentials {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

/// One calendar under a connection, with its enabled flag
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarRef {
    pub calendar_id: String,
    pub is_enabled: bool,
}

/// A connected (account, provider) pair
///
/// Owned and mutated by the external connection store; the engine only
/// reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarConnection {
    pub id: String,
    pub provider: ProviderKind,
    pub credentials: OAuthCredentials,
    pub is_connected: bool,
    pub calendars: Vec<CalendarRef>,
}

impl CalendarConnection {
    /// Ids of the calendars the user has toggled on for this connection.
    pub fn enabled_calendar_ids(&self) -> Vec<String> {
        self.calendars
            .iter()
            .filter(|c| c.is_enabled)
            .map(|c| c.calendar_id.clone())
            .collect()
    }
}

/// Absolute UTC interval during which a calendar reports the owner busy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusyPeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BusyPeriod {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// A period with `end` before `start` is malformed and never merged.
    pub fn is_well_formed(&self) -> bool {
        self.start <= self.end
    }
}

/// Busy interval rendered in the caller's timezone
///
/// Carries the same instants as the UTC form; only the offset
/// representation changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZonedPeriod {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

/// Half-open bookable interval `[start, end)` tagged with availability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub available: bool,
}

/// Daily working window in local wall-clock hours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkHours {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl Default for WorkHours {
    fn default() -> Self {
        Self { start_hour: DEFAULT_WORK_START_HOUR, end_hour: DEFAULT_WORK_END_HOUR }
    }
}

impl WorkHours {
    pub fn new(start_hour: u32, end_hour: u32) -> Self {
        Self { start_hour, end_hour }
    }

    /// The window must be non-empty and end within the day (24 = midnight).
    pub fn validate(&self) -> Result<()> {
        if self.end_hour > 24 {
            return Err(AvailoError::InvalidInput(format!(
                "work hours end at hour {}, past the end of the day",
                self.end_hour
            )));
        }
        if self.start_hour >= self.end_hour {
            return Err(AvailoError::InvalidInput(format!(
                "work hours start ({}) must be before end ({})",
                self.start_hour, self.end_hour
            )));
        }
        Ok(())
    }
}

/// Input to the availability aggregation service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRequest {
    pub account_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// IANA timezone identifier, e.g. `America/Los_Angeles`
    pub timezone: String,
    pub slot_duration_minutes: u32,
    pub work_hours: WorkHours,
}

impl AvailabilityRequest {
    /// Request with default slot duration and working window.
    pub fn new(
        account_id: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        timezone: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            start_date,
            end_date,
            timezone: timezone.into(),
            slot_duration_minutes: DEFAULT_SLOT_DURATION_MINUTES,
            work_hours: WorkHours::default(),
        }
    }

    /// Caller-input validation; timezone resolution happens separately.
    pub fn validate(&self) -> Result<()> {
        if self.end_date < self.start_date {
            return Err(AvailoError::InvalidInput(format!(
                "end date {} precedes start date {}",
                self.end_date, self.start_date
            )));
        }
        if self.slot_duration_minutes == 0 || self.slot_duration_minutes > MINUTES_PER_DAY {
            return Err(AvailoError::InvalidInput(format!(
                "slot duration must be between 1 and {MINUTES_PER_DAY} minutes, got {}",
                self.slot_duration_minutes
            )));
        }
        self.work_hours.validate()
    }
}

/// One calendar day of availability
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResult {
    pub date: NaiveDate,
    pub busy_periods: Vec<ZonedPeriod>,
    pub time_slots: Vec<TimeSlot>,
}

/// Range-wide availability with degradation visibility
///
/// `degraded` is set when at least one provider fetch failed and its busy
/// time was assumed empty; `failed_connections` names the sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityReport {
    pub days: Vec<AvailabilityResult>,
    pub busy_periods: Vec<ZonedPeriod>,
    pub degraded: bool,
    pub failed_connections: Vec<String>,
}
