//! SeaORM Entity for the meetings table.
//! One row per recorded meeting together with its AI-derived artifacts.

use crate::meeting_status::MeetingStatus;
use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = entity::meetings::Model)]
#[sea_orm(schema_name = "meetnotes", table_name = "meetings")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,

    pub title: String,

    pub folder_id: Option<Id>,

    pub owner_id: Id,

    pub status: MeetingStatus,

    /// Full transcript text; empty when transcription was unavailable
    #[sea_orm(column_type = "Text")]
    pub transcript: String,

    /// AI-generated summary of the transcript
    #[sea_orm(column_type = "Text")]
    pub summary: Option<String>,

    /// Relative path of the stored audio file
    pub audio_path: Option<String>,

    /// External calendar event linked to this meeting
    pub calendar_event_id: Option<String>,

    /// JSON-serialized list of extracted action items
    #[sea_orm(column_type = "Text")]
    pub action_items: Option<String>,

    pub is_favorite: bool,

    /// Scheduled start, kept verbatim as the client supplied it
    pub start_time: Option<String>,

    pub end_time: Option<String>,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::folders::Entity",
        from = "Column::FolderId",
        to = "super::folders::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Folders,

    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
}

impl Related<super::folders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Folders.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
