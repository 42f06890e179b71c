//! Meeting response DTO.
//!
//! The entity stores action items as a serialized JSON column; this
//! projection decodes them tolerantly so that an unreadable column renders
//! as an empty list instead of failing the request.

use chrono::{DateTime, FixedOffset};
use domain::action_items::{self, ActionItem};
use domain::meeting_status::MeetingStatus;
use domain::meetings::Model as MeetingModel;
use domain::Id;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct MeetingResponse {
    pub id: Id,
    pub title: String,
    pub folder_id: Option<Id>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<FixedOffset>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub status: MeetingStatus,
    pub transcript: String,
    pub summary: Option<String>,
    pub audio_path: Option<String>,
    pub calendar_event_id: Option<String>,
    #[schema(value_type = Vec<Object>)]
    pub action_items: Vec<ActionItem>,
    pub is_favorite: bool,
}

impl From<MeetingModel> for MeetingResponse {
    fn from(meeting: MeetingModel) -> Self {
        let action_items = action_items::from_stored(meeting.action_items.as_deref());

        Self {
            id: meeting.id,
            title: meeting.title,
            folder_id: meeting.folder_id,
            created_at: meeting.created_at,
            start_time: meeting.start_time,
            end_time: meeting.end_time,
            status: meeting.status,
            transcript: meeting.transcript,
            summary: meeting.summary,
            audio_path: meeting.audio_path,
            calendar_event_id: meeting.calendar_event_id,
            action_items,
            is_favorite: meeting.is_favorite,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(action_items: Option<&str>) -> MeetingModel {
        MeetingModel {
            id: Id::new_v4(),
            title: "Standup".to_string(),
            folder_id: None,
            owner_id: Id::new_v4(),
            status: MeetingStatus::Completed,
            transcript: "We talked.".to_string(),
            summary: None,
            audio_path: Some("audio/x.wav".to_string()),
            calendar_event_id: None,
            action_items: action_items.map(str::to_string),
            is_favorite: false,
            start_time: None,
            end_time: None,
            created_at: chrono::Utc::now().into(),
            updated_at: chrono::Utc::now().into(),
        }
    }

    #[test]
    fn test_decodes_stored_action_items() {
        let response = MeetingResponse::from(model(Some(
            r#"[{"task": "Ship it", "owner": null, "due_date": null, "status": "open"}]"#,
        )));
        assert_eq!(response.action_items.len(), 1);
        assert_eq!(response.action_items[0].task, "Ship it");
    }

    #[test]
    fn test_unreadable_column_renders_as_empty_list() {
        assert!(MeetingResponse::from(model(Some("{corrupt"))).action_items.is_empty());
        assert!(MeetingResponse::from(model(None)).action_items.is_empty());
    }
}
