//! Alternate "smart" summary views over an already-ingested meeting.
//!
//! Each recognized mode maps to a distinct instruction block; anything else
//! falls back to a generic summary instruction rather than erroring, so new
//! client modes degrade gracefully.

use crate::error::Error;
use crate::gateway;
use entity::meetings::Model as Meeting;
use entity::Id;
use entity_api::meeting;
use sea_orm::DatabaseConnection;
use service::config::Config;

/// Pick the instruction block for a requested summary mode.
fn instructions_for(mode: &str, persona_name: Option<&str>) -> String {
    match mode.to_lowercase().as_str() {
        "executive" => "Write an EXECUTIVE SUMMARY for a busy leader.\n\
             - 3-7 concise bullet points.\n\
             - Focus on decisions, outcomes, and major risks.\n\
             - Do not include implementation details.\n"
            .to_string(),
        "detailed" => "Write DETAILED NOTES from this meeting in markdown.\n\
             - Use sections and subheadings.\n\
             - Capture key arguments, options considered, and rationale.\n\
             - Include a short 'Decisions' section and a 'Next Steps' section.\n"
            .to_string(),
        "decisions" => "Highlight DECISIONS vs DISCUSSION in markdown.\n\
             - Create two main sections: 'Decisions' and 'Discussion'.\n\
             - In 'Decisions', list only clear decisions and owners.\n\
             - In 'Discussion', summarize the main points and open questions.\n"
            .to_string(),
        "persona" => {
            let target = persona_name
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .unwrap_or("this person");
            format!(
                "Write a short recap specifically for {target}.\n\
                 - Focus only on information, decisions, and action items relevant to them.\n\
                 - Use a friendly, concise tone.\n\
                 - Mention what they should pay attention to and any tasks they own.\n"
            )
        }
        _ => "Write a clear, concise summary with decisions and next steps.".to_string(),
    }
}

/// Whether the meeting carries enough content to summarize at all.
fn has_content(meeting: &Meeting) -> bool {
    !meeting.transcript.trim().is_empty()
        || meeting
            .summary
            .as_deref()
            .is_some_and(|summary| !summary.trim().is_empty())
}

/// Generate the requested summary view for one of the owner's meetings.
pub async fn for_meeting(
    db: &DatabaseConnection,
    config: &Config,
    owner_id: Id,
    meeting_id: Id,
    mode: &str,
    persona_name: Option<&str>,
    api_key: Option<&str>,
) -> Result<String, Error> {
    let meeting = meeting::find_by_id_for_owner(db, owner_id, meeting_id).await?;

    if !has_content(&meeting) {
        return Err(Error::bad_request(
            "No content available for this meeting yet",
        ));
    }

    let chat = gateway::chat_client(config, api_key)?;

    let context = format!(
        "Title: {}\nCreated at: {}\n\nExisting summary (may be empty):\n{}\n\nTranscript:\n{}\n",
        meeting.title,
        meeting.created_at.to_rfc3339(),
        meeting.summary.as_deref().unwrap_or("N/A"),
        meeting.transcript,
    );

    let prompt = format!(
        "You are an expert meeting note-taker.\n{}\n\nMeeting content:\n{}",
        instructions_for(mode, persona_name),
        context
    );

    chat.complete(&prompt).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity::meeting_status::MeetingStatus;

    fn meeting(transcript: &str, summary: Option<&str>) -> Meeting {
        Meeting {
            id: Id::new_v4(),
            title: "Weekly sync".to_string(),
            folder_id: None,
            owner_id: Id::new_v4(),
            status: MeetingStatus::Completed,
            transcript: transcript.to_string(),
            summary: summary.map(str::to_string),
            audio_path: None,
            calendar_event_id: None,
            action_items: None,
            is_favorite: false,
            start_time: None,
            end_time: None,
            created_at: chrono::Utc::now().into(),
            updated_at: chrono::Utc::now().into(),
        }
    }

    #[test]
    fn test_each_mode_selects_its_instruction_block() {
        assert!(instructions_for("executive", None).contains("EXECUTIVE SUMMARY"));
        assert!(instructions_for("EXECUTIVE", None).contains("EXECUTIVE SUMMARY"));
        assert!(instructions_for("detailed", None).contains("DETAILED NOTES"));
        assert!(instructions_for("decisions", None).contains("DECISIONS vs DISCUSSION"));
        assert!(instructions_for("persona", Some("Alice")).contains("specifically for Alice"));
    }

    #[test]
    fn test_persona_without_name_targets_this_person() {
        assert!(instructions_for("persona", None).contains("this person"));
        assert!(instructions_for("persona", Some("  ")).contains("this person"));
    }

    #[test]
    fn test_unrecognized_mode_falls_back_to_generic_instructions() {
        let generic = instructions_for("haiku", None);
        assert!(generic.contains("decisions and next steps"));
    }

    #[test]
    fn test_content_check_requires_transcript_or_summary() {
        assert!(!has_content(&meeting("", None)));
        assert!(!has_content(&meeting("   ", Some("  "))));
        assert!(has_content(&meeting("We talked.", None)));
        assert!(has_content(&meeting("", Some("A summary"))));
    }
}
