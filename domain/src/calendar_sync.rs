//! Create-or-merge synchronization between meetings and the external
//! calendar.
//!
//! Syncing is idempotent: the notes snippet is appended to an existing
//! event's description at most once, no matter how many times the same
//! meeting is synced. Unlike ingestion, every collaborator failure here
//! propagates; the user explicitly asked for the sync and must know when it
//! failed.

use crate::error::{DomainErrorKind, Error, ExternalErrorKind};
use crate::gateway::calendar::{CalendarClient, Event, EventTime};
use chrono::{DateTime, NaiveDateTime, TimeDelta};
use entity::meetings::Model as Meeting;
use entity::Id;
use entity_api::meeting;
use log::*;
use sea_orm::DatabaseConnection;

const NAIVE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Caller-supplied sync parameters; all optional.
#[derive(Debug, Clone, Default)]
pub struct SyncRequest {
    pub event_id: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

/// Create or update the calendar event for one of the owner's meetings, then
/// persist the resulting event id and time bounds back onto the meeting.
pub async fn sync(
    db: &DatabaseConnection,
    client: &CalendarClient,
    owner_id: Id,
    meeting_id: Id,
    request: SyncRequest,
) -> Result<Meeting, Error> {
    let mut target = meeting::find_by_id_for_owner(db, owner_id, meeting_id).await?;

    let (start, end) = resolve_times(
        request.start_time.as_deref(),
        request.end_time.as_deref(),
        &target,
    );
    let snippet = description_snippet(&target);

    let event_id = if let Some(event_id) = request.event_id {
        let mut event = client.get_event(&event_id).await?;

        event.description = Some(merge_description(
            event.description.as_deref().unwrap_or_default(),
            &snippet,
        ));
        if event.summary.as_deref().unwrap_or_default().is_empty() {
            event.summary = Some(target.title.clone());
        }
        event.start = Some(event_time(&start));
        event.end = Some(event_time(&end));

        let updated = client.update_event(&event_id, &event).await?;
        updated.id.unwrap_or(event_id)
    } else {
        let event = Event {
            summary: Some(target.title.clone()),
            description: Some(snippet),
            start: Some(event_time(&start)),
            end: Some(event_time(&end)),
            ..Default::default()
        };

        let created = client.create_event(&event).await?;
        created.id.ok_or_else(|| Error {
            source: None,
            error_kind: DomainErrorKind::External(ExternalErrorKind::Other(
                "Calendar backend returned an event without an id".to_string(),
            )),
        })?
    };

    info!("Synced meeting {} to calendar event {}", meeting_id, event_id);

    target.calendar_event_id = Some(event_id);
    target.start_time = Some(start);
    target.end_time = Some(end);
    Ok(meeting::update(db, meeting_id, target).await?)
}

/// List upcoming events from the user's primary calendar, read-only.
/// Defaults the window start to "now" when the caller gives no bound.
pub async fn list_events(
    config: &service::config::Config,
    user: &entity::users::Model,
    start: Option<&str>,
    end: Option<&str>,
    max_results: Option<u32>,
) -> Result<Vec<Event>, Error> {
    let client = crate::gateway::calendar_client(config, user)?;

    let time_min = start
        .map(str::to_string)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| chrono::Utc::now().to_rfc3339());

    client.list_events(&time_min, end, max_results).await
}

fn event_time(timestamp: &str) -> EventTime {
    EventTime {
        date_time: Some(timestamp.to_string()),
        date: None,
        time_zone: Some("UTC".to_string()),
    }
}

/// Resolve the event time bounds: explicit payload values win, then the
/// meeting's stored bounds, then defaults (creation time; start plus one
/// hour). An unparseable start degrades to a zero-length event rather than
/// failing the sync.
pub fn resolve_times(
    payload_start: Option<&str>,
    payload_end: Option<&str>,
    meeting: &Meeting,
) -> (String, String) {
    let start = payload_start
        .map(str::to_string)
        .filter(|s| !s.trim().is_empty())
        .or_else(|| {
            meeting
                .start_time
                .clone()
                .filter(|s| !s.trim().is_empty())
        })
        .unwrap_or_else(|| meeting.created_at.to_rfc3339());

    let end = payload_end
        .map(str::to_string)
        .filter(|s| !s.trim().is_empty())
        .or_else(|| meeting.end_time.clone().filter(|s| !s.trim().is_empty()))
        .unwrap_or_else(|| one_hour_after(&start).unwrap_or_else(|| start.clone()));

    (start, end)
}

/// Parse a loose timestamp and add one hour, preserving the input's shape.
fn one_hour_after(start: &str) -> Option<String> {
    if let Ok(aware) = DateTime::parse_from_rfc3339(start) {
        return Some((aware + TimeDelta::hours(1)).to_rfc3339());
    }

    NaiveDateTime::parse_from_str(start, NAIVE_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| (naive + TimeDelta::hours(1)).format(NAIVE_TIMESTAMP_FORMAT).to_string())
}

/// The notes snippet recorded on the calendar event for this meeting.
pub fn description_snippet(meeting: &Meeting) -> String {
    let mut lines = vec![
        "Meeting notes from MeetNotes:".to_string(),
        format!("Title: {}", meeting.title),
        format!("Created at: {}", meeting.created_at.to_rfc3339()),
    ];

    if let Some(summary) = meeting.summary.as_deref().filter(|s| !s.is_empty()) {
        lines.push(String::new());
        lines.push("Summary:".to_string());
        lines.push(summary.to_string());
    }

    lines.join("\n")
}

/// Append the snippet to an existing description, but only when it is not
/// already present.
pub fn merge_description(existing: &str, snippet: &str) -> String {
    if existing.contains(snippet) {
        existing.to_string()
    } else if existing.is_empty() {
        snippet.to_string()
    } else {
        format!("{existing}\n\n---\n{snippet}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity::meeting_status::MeetingStatus;

    fn meeting(start_time: Option<&str>, end_time: Option<&str>) -> Meeting {
        Meeting {
            id: Id::new_v4(),
            title: "Planning call".to_string(),
            folder_id: None,
            owner_id: Id::new_v4(),
            status: MeetingStatus::Completed,
            transcript: String::new(),
            summary: Some("We agreed on the roadmap.".to_string()),
            audio_path: None,
            calendar_event_id: None,
            action_items: None,
            is_favorite: false,
            start_time: start_time.map(str::to_string),
            end_time: end_time.map(str::to_string),
            created_at: DateTime::parse_from_rfc3339("2024-01-15T09:30:00+00:00").unwrap(),
            updated_at: DateTime::parse_from_rfc3339("2024-01-15T09:30:00+00:00").unwrap(),
        }
    }

    #[test]
    fn test_resolve_times_prefers_payload_then_stored_then_defaults() {
        let target = meeting(Some("2024-02-01T10:00:00+00:00"), Some("2024-02-01T11:30:00+00:00"));

        let (start, end) = resolve_times(
            Some("2024-03-01T08:00:00+00:00"),
            Some("2024-03-01T09:00:00+00:00"),
            &target,
        );
        assert_eq!(start, "2024-03-01T08:00:00+00:00");
        assert_eq!(end, "2024-03-01T09:00:00+00:00");

        let (start, end) = resolve_times(None, None, &target);
        assert_eq!(start, "2024-02-01T10:00:00+00:00");
        assert_eq!(end, "2024-02-01T11:30:00+00:00");
    }

    #[test]
    fn test_resolve_times_defaults_end_to_one_hour_after_start() {
        let target = meeting(Some("2024-02-01T10:00:00+00:00"), None);

        let (start, end) = resolve_times(None, None, &target);
        assert_eq!(start, "2024-02-01T10:00:00+00:00");
        assert_eq!(end, "2024-02-01T11:00:00+00:00");
    }

    #[test]
    fn test_resolve_times_handles_naive_timestamps() {
        let target = meeting(Some("2024-02-01T23:30:00"), None);

        let (_, end) = resolve_times(None, None, &target);
        assert_eq!(end, "2024-02-02T00:30:00");
    }

    #[test]
    fn test_resolve_times_falls_back_to_created_at() {
        let target = meeting(None, None);

        let (start, end) = resolve_times(None, None, &target);
        assert_eq!(start, "2024-01-15T09:30:00+00:00");
        assert_eq!(end, "2024-01-15T10:30:00+00:00");
    }

    #[test]
    fn test_resolve_times_unparseable_start_means_end_equals_start() {
        let target = meeting(Some("next tuesday-ish"), None);

        let (start, end) = resolve_times(None, None, &target);
        assert_eq!(start, "next tuesday-ish");
        assert_eq!(end, start);
    }

    #[test]
    fn test_merge_description_is_idempotent() {
        let target = meeting(None, None);
        let snippet = description_snippet(&target);

        let once = merge_description("Agenda: discuss roadmap", &snippet);
        assert!(once.contains("Agenda: discuss roadmap"));
        assert_eq!(once.matches(&snippet).count(), 1);

        // Merging again must not duplicate the snippet.
        let twice = merge_description(&once, &snippet);
        assert_eq!(twice, once);
        assert_eq!(twice.matches(&snippet).count(), 1);
    }

    #[test]
    fn test_merge_description_into_empty_is_just_the_snippet() {
        assert_eq!(merge_description("", "note"), "note");
    }

    #[test]
    fn test_description_snippet_includes_summary_when_present() {
        let with_summary = description_snippet(&meeting(None, None));
        assert!(with_summary.contains("Title: Planning call"));
        assert!(with_summary.contains("Summary:\nWe agreed on the roadmap."));

        let mut no_summary = meeting(None, None);
        no_summary.summary = None;
        assert!(!description_snippet(&no_summary).contains("Summary:"));
    }
}
