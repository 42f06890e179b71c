//! Response DTO for the calendar events listing.

use domain::gateway::calendar::Event;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct CalendarEventResponse {
    pub id: String,
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    pub html_link: Option<String>,
}

impl From<Event> for CalendarEventResponse {
    fn from(event: Event) -> Self {
        let start_time = event
            .start
            .as_ref()
            .and_then(|bound| bound.value())
            .unwrap_or_default()
            .to_string();
        let end_time = event
            .end
            .as_ref()
            .and_then(|bound| bound.value())
            .map(str::to_string)
            .unwrap_or_else(|| start_time.clone());

        Self {
            id: event.id.unwrap_or_default(),
            title: event.summary.unwrap_or_else(|| "(No title)".to_string()),
            start_time,
            end_time,
            html_link: event.html_link,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::gateway::calendar::EventTime;

    #[test]
    fn test_missing_end_falls_back_to_start() {
        let event = Event {
            id: Some("ev1".to_string()),
            summary: None,
            description: None,
            start: Some(EventTime {
                date_time: Some("2024-01-15T10:00:00Z".to_string()),
                date: None,
                time_zone: None,
            }),
            end: None,
            html_link: None,
        };

        let response = CalendarEventResponse::from(event);
        assert_eq!(response.title, "(No title)");
        assert_eq!(response.end_time, "2024-01-15T10:00:00Z");
    }
}
