//! Meeting lifecycle orchestration: ingestion, edits, deletion, and
//! on-demand re-extraction.

use crate::action_items::{self, ActionItem};
use crate::audio::AudioStore;
use crate::enrichment::{self, Enrichment};
use crate::error::Error;
use crate::gateway;
use crate::gateway::chat::ChatClient;
use crate::gateway::speech::SpeechClient;
use entity::meeting_status::MeetingStatus;
use entity::meetings::Model;
use entity::Id;
use entity_api::{folder, meeting};
use log::*;
use sea_orm::DatabaseConnection;
use service::config::Config;

pub use entity_api::meeting::{
    find_by_id_for_owner, find_by_owner, search_by_owner,
};

/// Caller-supplied fields for a new meeting.
#[derive(Debug, Clone)]
pub struct NewMeeting {
    pub title: String,
    pub folder_id: Option<Id>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub calendar_event_id: Option<String>,
}

/// Fields a metadata patch may change. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default)]
pub struct MetadataUpdate {
    pub title: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub calendar_event_id: Option<String>,
}

/// Ingest an uploaded recording into a new meeting record.
///
/// The recording itself must land on disk; once it has, nothing on the AI
/// path is allowed to fail the request. A missing credential or an
/// unreachable backend degrades to a meeting with an empty transcript, no
/// summary, and no action items.
pub async fn create_with_audio(
    db: &DatabaseConnection,
    config: &Config,
    owner_id: Id,
    params: NewMeeting,
    api_key: Option<&str>,
    audio: Vec<u8>,
) -> Result<Model, Error> {
    let meeting_id = Id::new_v4();
    let filename = format!("{meeting_id}.wav");

    let store = AudioStore::new(config.audio_dir());
    store.store(&audio, &filename).await?;

    let enriched = match ai_clients(config, api_key) {
        Ok((chat, speech)) => enrichment::run(&chat, &speech, audio, &filename).await,
        Err(e) => {
            warn!("AI backend unavailable; storing audio without enrichment: {e:?}");
            Enrichment::default()
        }
    };

    let now = chrono::Utc::now();
    let model = Model {
        id: meeting_id,
        title: params.title,
        folder_id: params.folder_id,
        owner_id,
        status: MeetingStatus::Completed,
        transcript: enriched.transcript,
        summary: enriched.summary,
        audio_path: Some(format!("audio/{filename}")),
        calendar_event_id: params.calendar_event_id,
        action_items: Some(action_items::to_stored(&enriched.action_items)),
        is_favorite: false,
        start_time: params.start_time,
        end_time: params.end_time,
        created_at: now.into(),
        updated_at: now.into(),
    };

    Ok(meeting::create(db, model).await?)
}

fn ai_clients(
    config: &Config,
    api_key: Option<&str>,
) -> Result<(ChatClient, SpeechClient), Error> {
    Ok((
        gateway::chat_client(config, api_key)?,
        gateway::speech_client(config, api_key)?,
    ))
}

/// Apply a partial metadata update to one of the owner's meetings.
pub async fn update_metadata(
    db: &DatabaseConnection,
    owner_id: Id,
    id: Id,
    update: MetadataUpdate,
) -> Result<Model, Error> {
    let mut target = meeting::find_by_id_for_owner(db, owner_id, id).await?;

    if let Some(title) = update.title {
        target.title = title;
    }
    if let Some(start_time) = update.start_time {
        target.start_time = Some(start_time);
    }
    if let Some(end_time) = update.end_time {
        target.end_time = Some(end_time);
    }
    if let Some(calendar_event_id) = update.calendar_event_id {
        target.calendar_event_id = Some(calendar_event_id);
    }

    Ok(meeting::update(db, id, target).await?)
}

/// Set or clear the favorite flag.
pub async fn set_favorite(
    db: &DatabaseConnection,
    owner_id: Id,
    id: Id,
    favorite: bool,
) -> Result<Model, Error> {
    let mut target = meeting::find_by_id_for_owner(db, owner_id, id).await?;
    target.is_favorite = favorite;
    Ok(meeting::update(db, id, target).await?)
}

/// Move a meeting into a folder, or out of any folder with `None`. The
/// target folder must belong to the same owner.
pub async fn assign_folder(
    db: &DatabaseConnection,
    owner_id: Id,
    id: Id,
    folder_id: Option<Id>,
) -> Result<Model, Error> {
    let mut target = meeting::find_by_id_for_owner(db, owner_id, id).await?;

    if let Some(folder_id) = folder_id {
        folder::find_by_id_for_owner(db, owner_id, folder_id).await?;
    }

    target.folder_id = folder_id;
    Ok(meeting::update(db, id, target).await?)
}

/// Replace the meeting's stored action items with a caller-supplied list.
pub async fn replace_action_items(
    db: &DatabaseConnection,
    owner_id: Id,
    id: Id,
    items: Vec<ActionItem>,
) -> Result<Model, Error> {
    let mut target = meeting::find_by_id_for_owner(db, owner_id, id).await?;
    target.action_items = Some(action_items::to_stored(&items));
    Ok(meeting::update(db, id, target).await?)
}

/// Re-run action-item extraction over the stored transcript and persist the
/// result.
///
/// Unlike ingestion, this explicit request does surface AI failures: a
/// missing credential or an upstream error propagates, and asking to extract
/// from a meeting without a transcript is a bad request.
pub async fn reextract_action_items(
    db: &DatabaseConnection,
    config: &Config,
    owner_id: Id,
    id: Id,
    api_key: Option<&str>,
) -> Result<Model, Error> {
    let mut target = meeting::find_by_id_for_owner(db, owner_id, id).await?;

    if target.transcript.trim().is_empty() {
        return Err(Error::bad_request(
            "No transcript available to extract action items from",
        ));
    }

    let chat = gateway::chat_client(config, api_key)?;
    let items = action_items::extract(&chat, &target.transcript).await?;

    info!("Re-extracted {} action items for meeting {}", items.len(), id);

    target.action_items = Some(action_items::to_stored(&items));
    Ok(meeting::update(db, id, target).await?)
}

/// Delete one of the owner's meetings along with its stored audio file.
pub async fn delete(
    db: &DatabaseConnection,
    config: &Config,
    owner_id: Id,
    id: Id,
) -> Result<(), Error> {
    let target = meeting::find_by_id_for_owner(db, owner_id, id).await?;

    // Audio removal is best-effort; a missing file must not block deletion.
    if let Some(audio_path) = &target.audio_path {
        if let Some(filename) = audio_path.rsplit('/').next() {
            AudioStore::new(config.audio_dir()).remove(filename).await;
        }
    }

    Ok(meeting::delete_by_id(db, id).await?)
}
