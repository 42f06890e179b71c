use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle status of a meeting record.
///
/// A meeting is created only once ingestion has finished, so records are
/// normally `completed` from birth; `pending` exists for future asynchronous
/// ingestion paths.
#[derive(
    Debug, Clone, Eq, PartialEq, EnumIter, Deserialize, Default, Serialize, DeriveActiveEnum, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "meeting_status")]
pub enum MeetingStatus {
    /// Ingestion has been requested but the record is not finalized yet
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Audio is stored and whatever enrichment was available has been applied
    #[sea_orm(string_value = "completed")]
    #[default]
    Completed,
}

impl std::fmt::Display for MeetingStatus {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeetingStatus::Pending => write!(fmt, "pending"),
            MeetingStatus::Completed => write!(fmt, "completed"),
        }
    }
}
