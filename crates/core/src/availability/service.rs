//! Unified availability aggregation service
//!
//! Fans out to every connected calendar provider concurrently, tolerates
//! per-provider failure, merges the surviving busy periods, and renders
//! the result in the caller's timezone. Provider faults never escape this
//! service; only caller misconfiguration does.

use std::collections::HashMap;
use std::sync::Arc;

use availo_domain::{
    AvailabilityReport, AvailabilityRequest, AvailabilityResult, AvailoError, BusyPeriod,
    ProviderKind, Result, ZonedPeriod,
};
use chrono_tz::Tz;
use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::{debug, info, instrument, warn};

use super::fan_out;
use super::merge::merge;
use super::slots::generate_slots;
use super::timezone;
use crate::ports::{AccessTokenSource, AvailabilityProvider, ConnectionStore, FreeBusyQuery};

/// Resolves a provider kind to its registered adapter.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<ProviderKind, Arc<dyn AvailabilityProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter under its own kind; the latest wins.
    #[must_use]
    pub fn register(mut self, provider: Arc<dyn AvailabilityProvider>) -> Self {
        self.providers.insert(provider.kind(), provider);
        self
    }

    pub fn get(&self, kind: ProviderKind) -> Option<Arc<dyn AvailabilityProvider>> {
        self.providers.get(&kind).cloned()
    }
}

/// The unified availability aggregator.
pub struct AvailabilityService {
    connections: Arc<dyn ConnectionStore>,
    tokens: Arc<dyn AccessTokenSource>,
    providers: ProviderRegistry,
}

/// Merged fetch outcome before timezone rendering.
#[derive(Default)]
struct FetchOutcome {
    merged: Vec<BusyPeriod>,
    failed_connections: Vec<String>,
}

impl AvailabilityService {
    pub fn new(
        connections: Arc<dyn ConnectionStore>,
        tokens: Arc<dyn AccessTokenSource>,
        providers: ProviderRegistry,
    ) -> Self {
        Self { connections, tokens, providers }
    }

    /// Merged busy periods across all connected calendars, rendered in the
    /// requested timezone.
    ///
    /// Zero connections (or zero enabled calendars) yields an empty list,
    /// not an error.
    #[instrument(skip(self, request), fields(account_id = %request.account_id))]
    pub async fn get_unified_availability(
        &self,
        request: &AvailabilityRequest,
    ) -> Result<Vec<ZonedPeriod>> {
        let tz = timezone::resolve_timezone(&request.timezone)?;
        request.validate()?;

        let outcome = self.fetch_merged_busy(request, tz).await?;
        Ok(outcome.merged.iter().map(|p| timezone::to_zoned(p, tz)).collect())
    }

    /// Per-day availability for the requested range: busy periods plus
    /// discretized slots for each calendar day, with degradation
    /// visibility when a provider could not be reached.
    #[instrument(skip(self, request), fields(account_id = %request.account_id))]
    pub async fn get_availability_report(
        &self,
        request: &AvailabilityRequest,
    ) -> Result<AvailabilityReport> {
        let tz = timezone::resolve_timezone(&request.timezone)?;
        request.validate()?;

        let outcome = self.fetch_merged_busy(request, tz).await?;

        let mut days = Vec::new();
        let mut date = request.start_date;
        while date <= request.end_date {
            let day_start = timezone::start_of_day(date, tz)?;
            let day_end = timezone::end_of_day(date, tz)?;

            let day_busy: Vec<ZonedPeriod> = outcome
                .merged
                .iter()
                .filter(|p| p.start < day_end && p.end > day_start)
                .map(|p| timezone::to_zoned(p, tz))
                .collect();

            let time_slots = generate_slots(
                date,
                tz,
                &outcome.merged,
                request.work_hours,
                request.slot_duration_minutes,
            )?;

            days.push(AvailabilityResult { date, busy_periods: day_busy, time_slots });

            date = date.succ_opt().ok_or_else(|| {
                AvailoError::Internal(format!("calendar overflow advancing past {date}"))
            })?;
        }

        Ok(AvailabilityReport {
            days,
            busy_periods: outcome.merged.iter().map(|p| timezone::to_zoned(p, tz)).collect(),
            degraded: !outcome.failed_connections.is_empty(),
            failed_connections: outcome.failed_connections,
        })
    }

    /// Fan out one fetch task per connection, degrade failures to empty,
    /// and merge whatever survived.
    async fn fetch_merged_busy(
        &self,
        request: &AvailabilityRequest,
        tz: Tz,
    ) -> Result<FetchOutcome> {
        let time_min = timezone::start_of_day(request.start_date, tz)?;
        let time_max = timezone::end_of_day(request.end_date, tz)?;

        let connections =
            self.connections.connections_for_account(&request.account_id).await?;

        let mut tasks: Vec<(String, BoxFuture<'_, Result<Vec<BusyPeriod>>>)> = Vec::new();
        for connection in connections {
            if !connection.is_connected {
                debug!(connection_id = %connection.id, "connection disconnected; skipping");
                continue;
            }
            let calendar_ids = connection.enabled_calendar_ids();
            if calendar_ids.is_empty() {
                debug!(connection_id = %connection.id, "no enabled calendars; skipping");
                continue;
            }

            let label = connection.id.clone();
            let Some(provider) = self.providers.get(connection.provider) else {
                // routed through the same degrade path as a fetch failure
                let kind = connection.provider;
                tasks.push((
                    label,
                    async move {
                        Err(AvailoError::Internal(format!(
                            "no adapter registered for provider {kind}"
                        )))
                    }
                    .boxed(),
                ));
                continue;
            };

            let tokens = Arc::clone(&self.tokens);
            tasks.push((
                label,
                async move {
                    let access_token = tokens.access_token(&connection).await?;
                    let query = FreeBusyQuery { access_token, calendar_ids, time_min, time_max };
                    provider.fetch_busy_periods(&query).await
                }
                .boxed(),
            ));
        }

        if tasks.is_empty() {
            debug!(account_id = %request.account_id, "no connections with enabled calendars");
            return Ok(FetchOutcome::default());
        }

        let settled = fan_out::join_settled(tasks).await;
        for (connection_id, error) in &settled.failures {
            warn!(
                connection_id = %connection_id,
                error = %error,
                "provider fetch failed; treating source as free"
            );
        }

        let flattened: Vec<BusyPeriod> = settled.successes.into_iter().flatten().collect();
        let merged = merge(flattened);

        info!(
            merged = merged.len(),
            failed = settled.failures.len(),
            "aggregated busy periods"
        );

        Ok(FetchOutcome {
            merged,
            failed_connections: settled.failures.into_iter().map(|(id, _)| id).collect(),
        })
    }
}
