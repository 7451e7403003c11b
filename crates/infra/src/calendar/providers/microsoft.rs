//! Microsoft Calendar provider implementation
//!
//! Graph has no batched free/busy endpoint comparable to Google's, so the
//! adapter issues one calendar-view query per calendar id, requesting UTC
//! via the Outlook preference header and following pagination cursors
//! until exhausted. A failing calendar is logged and skipped so one bad
//! calendar does not abort the rest of the connection.

use async_trait::async_trait;
use availo_core::ports::{AvailabilityProvider, FreeBusyQuery};
use availo_domain::{AvailoError, BusyPeriod, ProviderKind, Result};
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::calendar::config::CalendarApiConfig;
use crate::errors::InfraError;
use crate::http::HttpClient;

const OUTLOOK_TIMEZONE_HEADER: &str = r#"outlook.timezone="UTC""#;
const OUTLOOK_MAX_PAGE_SIZE_HEADER: &str = r#"odata.maxpagesize=50"#;

/// Microsoft Calendar provider
pub struct MicrosoftProvider {
    http: HttpClient,
    graph_base: String,
}

impl MicrosoftProvider {
    pub fn new(http: HttpClient, config: &CalendarApiConfig) -> Self {
        Self { http, graph_base: config.microsoft_graph_base.clone() }
    }

    fn calendar_view_url(&self, calendar_id: &str) -> String {
        if calendar_id.eq_ignore_ascii_case("primary") {
            format!("{}/me/calendarView", self.graph_base)
        } else {
            format!("{}/me/calendars/{}/calendarView", self.graph_base, calendar_id)
        }
    }

    /// Fetch one calendar's view, following `@odata.nextLink` pages.
    async fn fetch_calendar_view(
        &self,
        calendar_id: &str,
        query: &FreeBusyQuery,
    ) -> Result<Vec<BusyPeriod>> {
        let mut periods = Vec::new();
        let mut next_link: Option<String> = None;

        loop {
            let request = match &next_link {
                Some(link) => self.http.request(Method::GET, link),
                None => self.http.request(Method::GET, &self.calendar_view_url(calendar_id)).query(
                    &[
                        ("startDateTime", query.time_min.to_rfc3339()),
                        ("endDateTime", query.time_max.to_rfc3339()),
                        ("$select", "start,end,showAs".to_string()),
                    ],
                ),
            };

            let request = request
                .bearer_auth(&query.access_token)
                .header("Prefer", OUTLOOK_TIMEZONE_HEADER)
                .header("Prefer", OUTLOOK_MAX_PAGE_SIZE_HEADER);

            let response = self.http.send(request).await?;

            if !response.status().is_success() {
                let status = response.status();
                let error_text =
                    response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
                return Err(InfraError(AvailoError::Provider(format!(
                    "Microsoft API error ({}): {}",
                    status, error_text
                )))
                .into());
            }

            let page: MicrosoftCalendarViewResponse = response.json().await.map_err(|e| {
                InfraError(AvailoError::Provider(format!(
                    "Failed to parse Microsoft calendar view response: {}",
                    e
                )))
            })?;

            for event in page.value {
                if !counts_as_busy(event.show_as.as_deref()) {
                    debug!(calendar_id, "skipping event marked free");
                    continue;
                }
                match busy_period_from_event(&event) {
                    Some(period) => periods.push(period),
                    None => debug!(calendar_id, "dropping event missing start or end"),
                }
            }

            match page.next_link {
                Some(link) if Url::parse(&link).is_ok() => next_link = Some(link),
                Some(link) => {
                    warn!(calendar_id, link = %link, "unparseable pagination link; stopping pagination");
                    break;
                }
                None => break,
            }
        }

        Ok(periods)
    }
}

#[async_trait]
impl AvailabilityProvider for MicrosoftProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Microsoft
    }

    async fn fetch_busy_periods(&self, query: &FreeBusyQuery) -> Result<Vec<BusyPeriod>> {
        let mut periods = Vec::new();

        for calendar_id in &query.calendar_ids {
            match self.fetch_calendar_view(calendar_id, query).await {
                Ok(mut found) => periods.append(&mut found),
                Err(e) => {
                    warn!(
                        calendar_id = %calendar_id,
                        error = %e,
                        "failed to fetch calendar view; skipping calendar"
                    );
                }
            }
        }

        Ok(periods)
    }
}

/// Everything except an explicit `free` blocks time: busy, tentative, oof,
/// workingElsewhere, and unknown statuses all count.
fn counts_as_busy(show_as: Option<&str>) -> bool {
    !matches!(show_as, Some(status) if status.eq_ignore_ascii_case("free"))
}

fn busy_period_from_event(event: &MicrosoftEvent) -> Option<BusyPeriod> {
    let start = parse_graph_datetime(event.start.as_ref()?)?;
    let end = parse_graph_datetime(event.end.as_ref()?)?;
    Some(BusyPeriod::new(start, end))
}

fn parse_graph_datetime(value: &GraphDateTime) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&normalise_event_time(&value.date_time))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Graph omits the UTC suffix on `dateTime` values even when the payload
/// was requested in UTC; append it exactly once.
fn normalise_event_time(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.ends_with('Z') || trimmed.ends_with('z') {
        trimmed.to_owned()
    } else {
        format!("{trimmed}Z")
    }
}

#[derive(Debug, Deserialize)]
struct MicrosoftCalendarViewResponse {
    #[serde(default)]
    value: Vec<MicrosoftEvent>,
    #[serde(rename = "@odata.nextLink")]
    next_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MicrosoftEvent {
    start: Option<GraphDateTime>,
    end: Option<GraphDateTime>,
    #[serde(rename = "showAs")]
    show_as: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GraphDateTime {
    #[serde(rename = "dateTime")]
    date_time: String,
    #[allow(dead_code)]
    #[serde(rename = "timeZone")]
    time_zone: Option<String>,
}
