//! Google Calendar provider implementation
//!
//! Issues one batched free/busy query across all requested calendars; the
//! response carries a busy array per calendar which is flattened into the
//! uniform UTC representation.

use std::collections::HashMap;

use async_trait::async_trait;
use availo_core::ports::{AvailabilityProvider, FreeBusyQuery};
use availo_domain::{AvailoError, BusyPeriod, ProviderKind, Result};
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calendar::config::CalendarApiConfig;
use crate::errors::InfraError;
use crate::http::HttpClient;

/// Google Calendar provider
pub struct GoogleProvider {
    http: HttpClient,
    api_base: String,
}

impl GoogleProvider {
    pub fn new(http: HttpClient, config: &CalendarApiConfig) -> Self {
        Self { http, api_base: config.google_api_base.clone() }
    }
}

#[async_trait]
impl AvailabilityProvider for GoogleProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Google
    }

    /// One `freeBusy` call covers every calendar id in the query; a
    /// failure of that call fails the whole connection fetch and is
    /// handled by the aggregation layer.
    async fn fetch_busy_periods(&self, query: &FreeBusyQuery) -> Result<Vec<BusyPeriod>> {
        let url = format!("{}/freeBusy", self.api_base);
        let body = GoogleFreeBusyRequest {
            time_min: query.time_min.to_rfc3339(),
            time_max: query.time_max.to_rfc3339(),
            time_zone: "UTC".to_string(),
            items: query
                .calendar_ids
                .iter()
                .map(|id| GoogleFreeBusyItem { id: id.clone() })
                .collect(),
        };

        debug!(calendars = query.calendar_ids.len(), "querying Google free/busy");

        let request = self
            .http
            .request(Method::POST, &url)
            .bearer_auth(&query.access_token)
            .json(&body);
        let response = self.http.send(request).await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(InfraError(AvailoError::Provider(format!(
                "Google API error ({}): {}",
                status, error_text
            )))
            .into());
        }

        let free_busy: GoogleFreeBusyResponse = response.json().await.map_err(|e| {
            InfraError(AvailoError::Provider(format!(
                "Failed to parse Google free/busy response: {}",
                e
            )))
        })?;

        let mut periods = Vec::new();
        for (calendar_id, calendar) in free_busy.calendars {
            for error in calendar.errors.unwrap_or_default() {
                warn!(
                    calendar_id = %calendar_id,
                    reason = %error.reason,
                    "Google reported a calendar-level error"
                );
            }

            for entry in calendar.busy {
                match busy_period_from_entry(&entry) {
                    Some(period) => periods.push(period),
                    None => {
                        debug!(
                            calendar_id = %calendar_id,
                            "dropping busy entry missing or malforming start/end"
                        );
                    }
                }
            }
        }

        Ok(periods)
    }
}

/// Both bounds must be present and parse as RFC 3339 instants; anything
/// else is dropped at this boundary.
fn busy_period_from_entry(entry: &GoogleBusyEntry) -> Option<BusyPeriod> {
    let start = parse_instant(entry.start.as_deref()?)?;
    let end = parse_instant(entry.end.as_deref()?)?;
    Some(BusyPeriod::new(start, end))
}

fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[derive(Debug, Serialize)]
struct GoogleFreeBusyRequest {
    #[serde(rename = "timeMin")]
    time_min: String,
    #[serde(rename = "timeMax")]
    time_max: String,
    #[serde(rename = "timeZone")]
    time_zone: String,
    items: Vec<GoogleFreeBusyItem>,
}

#[derive(Debug, Serialize)]
struct GoogleFreeBusyItem {
    id: String,
}

#[derive(Debug, Deserialize)]
struct GoogleFreeBusyResponse {
    #[serde(default)]
    calendars: HashMap<String, GoogleCalendarBusy>,
}

#[derive(Debug, Deserialize)]
struct GoogleCalendarBusy {
    #[serde(default)]
    busy: Vec<GoogleBusyEntry>,
    errors: Option<Vec<GoogleCalendarError>>,
}

#[derive(Debug, Deserialize)]
struct GoogleBusyEntry {
    start: Option<String>,
    end: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleCalendarError {
    #[serde(default)]
    reason: String,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;
    use wiremock::matchers::{bearer_token, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn provider_for(server: &MockServer) -> GoogleProvider {
        let config = CalendarApiConfig::with_base(&server.uri());
        GoogleProvider::new(HttpClient::new().expect("http client"), &config)
    }

    fn query(calendar_ids: &[&str]) -> FreeBusyQuery {
        FreeBusyQuery {
            access_token: "google-token".to_string(),
            calendar_ids: calendar_ids.iter().map(|s| s.to_string()).collect(),
            time_min: Utc.with_ymd_and_hms(2025, 11, 17, 0, 0, 0).unwrap(),
            time_max: Utc.with_ymd_and_hms(2025, 11, 17, 23, 59, 59).unwrap(),
        }
    }

    #[tokio::test]
    async fn flattens_busy_arrays_across_calendars() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/freeBusy"))
            .and(bearer_token("google-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "calendars": {
                    "primary": {
                        "busy": [
                            {"start": "2025-11-17T10:00:00Z", "end": "2025-11-17T11:00:00Z"}
                        ]
                    },
                    "team": {
                        "busy": [
                            {"start": "2025-11-17T14:00:00Z", "end": "2025-11-17T15:00:00Z"}
                        ]
                    }
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let mut periods = provider
            .fetch_busy_periods(&query(&["primary", "team"]))
            .await
            .expect("busy periods");
        periods.sort_by_key(|p| p.start);

        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0].start, Utc.with_ymd_and_hms(2025, 11, 17, 10, 0, 0).unwrap());
        assert_eq!(periods[1].end, Utc.with_ymd_and_hms(2025, 11, 17, 15, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn sends_one_batched_request_with_all_calendar_ids() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/freeBusy"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"calendars": {}})))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        provider
            .fetch_busy_periods(&query(&["primary", "team", "oncall"]))
            .await
            .expect("busy periods");

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1, "expected a single batched free/busy call");

        let body: serde_json::Value = requests[0].body_json().unwrap();
        assert_eq!(body["timeZone"], "UTC");
        let ids: Vec<&str> =
            body["items"].as_array().unwrap().iter().map(|i| i["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["primary", "team", "oncall"]);
    }

    #[tokio::test]
    async fn drops_entries_missing_start_or_end() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/freeBusy"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "calendars": {
                    "primary": {
                        "busy": [
                            {"start": "2025-11-17T10:00:00Z"},
                            {"end": "2025-11-17T11:00:00Z"},
                            {"start": "2025-11-17T12:00:00Z", "end": "2025-11-17T13:00:00Z"}
                        ]
                    }
                }
            })))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let periods =
            provider.fetch_busy_periods(&query(&["primary"])).await.expect("busy periods");

        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].start, Utc.with_ymd_and_hms(2025, 11, 17, 12, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn api_failure_propagates_as_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/freeBusy"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let result = provider.fetch_busy_periods(&query(&["primary"])).await;

        match result {
            Err(AvailoError::Provider(msg)) => assert!(msg.contains("403")),
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn calendar_level_errors_do_not_drop_other_calendars() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/freeBusy"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "calendars": {
                    "broken": {
                        "busy": [],
                        "errors": [{"domain": "global", "reason": "notFound"}]
                    },
                    "primary": {
                        "busy": [
                            {"start": "2025-11-17T09:00:00Z", "end": "2025-11-17T09:30:00Z"}
                        ]
                    }
                }
            })))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let periods =
            provider.fetch_busy_periods(&query(&["broken", "primary"])).await.expect("periods");

        assert_eq!(periods.len(), 1);
    }
}
