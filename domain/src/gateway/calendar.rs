//! Calendar API client for the user's primary calendar.
//!
//! This module provides an HTTP client for the Google Calendar v3 events API,
//! used to create, merge, and list calendar events for meetings.

use crate::error::{DomainErrorKind, Error, ExternalErrorKind, InternalErrorKind};
use crate::gateway::body_excerpt;
use log::*;
use serde::{Deserialize, Serialize};

/// Events are always managed on the user's primary calendar.
const CALENDAR_ID: &str = "primary";

/// Start or end bound of a calendar event
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EventTime {
    #[serde(rename = "dateTime", default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    /// All-day events carry a date instead of a dateTime
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(rename = "timeZone", default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl EventTime {
    /// The usable bound value, preferring the timed form.
    pub fn value(&self) -> Option<&str> {
        self.date_time.as_deref().or(self.date.as_deref())
    }
}

/// A calendar event as the API exchanges it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Event {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Event title; the calendar API calls this "summary"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<EventTime>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<EventTime>,

    #[serde(rename = "htmlLink", default, skip_serializing_if = "Option::is_none")]
    pub html_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EventListResponse {
    #[serde(default)]
    items: Vec<Event>,
}

/// Calendar API client
pub struct CalendarClient {
    client: reqwest::Client,
    base_url: String,
}

impl CalendarClient {
    /// Create a new calendar client with the given OAuth access token and base URL
    pub fn new(access_token: &str, base_url: &str) -> Result<Self, Error> {
        let mut headers = reqwest::header::HeaderMap::new();

        let auth_value = format!("Bearer {}", access_token);
        let mut header_value =
            reqwest::header::HeaderValue::from_str(&auth_value).map_err(|e| {
                warn!("Failed to create auth header: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                        "Invalid access token format".to_string(),
                    )),
                }
            })?;
        header_value.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, header_value);

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch an existing event by id
    pub async fn get_event(&self, event_id: &str) -> Result<Event, Error> {
        let url = format!(
            "{}/calendars/{}/events/{}",
            self.base_url, CALENDAR_ID, event_id
        );

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!("Failed to fetch calendar event {}: {:?}", event_id, e);
            Error::from(e)
        })?;

        self.parse_event_response(response).await
    }

    /// Create a new event on the primary calendar
    pub async fn create_event(&self, event: &Event) -> Result<Event, Error> {
        let url = format!("{}/calendars/{}/events", self.base_url, CALENDAR_ID);

        debug!("Creating calendar event: {:?}", event.summary);

        let response = self.client.post(&url).json(event).send().await.map_err(|e| {
            warn!("Failed to create calendar event: {:?}", e);
            Error::from(e)
        })?;

        self.parse_event_response(response).await
    }

    /// Replace an existing event's body
    pub async fn update_event(&self, event_id: &str, event: &Event) -> Result<Event, Error> {
        let url = format!(
            "{}/calendars/{}/events/{}",
            self.base_url, CALENDAR_ID, event_id
        );

        debug!("Updating calendar event: {}", event_id);

        let response = self.client.put(&url).json(event).send().await.map_err(|e| {
            warn!("Failed to update calendar event {}: {:?}", event_id, e);
            Error::from(e)
        })?;

        self.parse_event_response(response).await
    }

    /// List upcoming events on the primary calendar, ordered by start time
    pub async fn list_events(
        &self,
        time_min: &str,
        time_max: Option<&str>,
        max_results: Option<u32>,
    ) -> Result<Vec<Event>, Error> {
        let url = format!("{}/calendars/{}/events", self.base_url, CALENDAR_ID);

        let mut query: Vec<(&str, String)> = vec![
            ("timeMin", time_min.to_string()),
            ("singleEvents", "true".to_string()),
            ("orderBy", "startTime".to_string()),
        ];
        if let Some(time_max) = time_max {
            query.push(("timeMax", time_max.to_string()));
        }
        if let Some(max_results) = max_results {
            query.push(("maxResults", max_results.to_string()));
        }

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to list calendar events: {:?}", e);
                Error::from(e)
            })?;

        let status = response.status();
        if status.is_success() {
            let list: EventListResponse = response.json().await.map_err(|e| {
                warn!("Failed to parse calendar event list: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Other(
                        "Invalid response from calendar API".to_string(),
                    )),
                }
            })?;
            Ok(list.items)
        } else {
            Err(self.upstream_error(status, response).await)
        }
    }

    async fn parse_event_response(&self, response: reqwest::Response) -> Result<Event, Error> {
        let status = response.status();
        if status.is_success() {
            response.json().await.map_err(|e| {
                warn!("Failed to parse calendar event response: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Other(
                        "Invalid response from calendar API".to_string(),
                    )),
                }
            })
        } else {
            Err(self.upstream_error(status, response).await)
        }
    }

    async fn upstream_error(
        &self,
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> Error {
        let body = body_excerpt(&response.text().await.unwrap_or_default());
        error!("Calendar API error {}: {}", status, body);
        Error {
            source: None,
            error_kind: DomainErrorKind::External(ExternalErrorKind::Upstream {
                status: status.as_u16(),
                body,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_event_parses_wire_names() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/calendars/primary/events/ev123")
            .with_status(200)
            .with_body(
                json!({
                    "id": "ev123",
                    "summary": "Weekly sync",
                    "start": {"dateTime": "2024-01-15T10:00:00Z", "timeZone": "UTC"},
                    "end": {"dateTime": "2024-01-15T11:00:00Z", "timeZone": "UTC"},
                    "htmlLink": "https://calendar.example/ev123"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = CalendarClient::new("token", &server.url()).unwrap();
        let event = client.get_event("ev123").await.unwrap();

        assert_eq!(event.id.as_deref(), Some("ev123"));
        assert_eq!(event.summary.as_deref(), Some("Weekly sync"));
        assert_eq!(
            event.start.unwrap().value(),
            Some("2024-01-15T10:00:00Z")
        );
        assert_eq!(event.html_link.as_deref(), Some("https://calendar.example/ev123"));
    }

    #[tokio::test]
    async fn test_get_event_failure_is_upstream() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/calendars/primary/events/missing")
            .with_status(404)
            .with_body("Not Found")
            .create_async()
            .await;

        let client = CalendarClient::new("token", &server.url()).unwrap();
        let err = client.get_event("missing").await.unwrap_err();
        assert!(matches!(
            err.error_kind,
            DomainErrorKind::External(ExternalErrorKind::Upstream { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_event_time_value_prefers_date_time() {
        let bound = EventTime {
            date_time: Some("2024-01-15T10:00:00Z".to_string()),
            date: Some("2024-01-15".to_string()),
            time_zone: None,
        };
        assert_eq!(bound.value(), Some("2024-01-15T10:00:00Z"));

        let all_day = EventTime {
            date_time: None,
            date: Some("2024-01-15".to_string()),
            time_zone: None,
        };
        assert_eq!(all_day.value(), Some("2024-01-15"));
    }
}
