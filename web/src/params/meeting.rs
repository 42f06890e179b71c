use domain::Id;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct IndexParams {
    /// Restrict to one folder
    pub(crate) folder_id: Option<Id>,
    /// Return favorites only
    #[serde(default)]
    pub(crate) favorites_only: bool,
}

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct SearchParams {
    /// Substring matched against title, summary, and transcript
    pub(crate) q: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct UpdateMetadataParams {
    pub(crate) title: Option<String>,
    pub(crate) start_time: Option<String>,
    pub(crate) end_time: Option<String>,
    pub(crate) calendar_event_id: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct FavoriteParams {
    pub(crate) favorite: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct FolderAssignmentParams {
    /// Target folder; `null` moves the meeting out of any folder
    pub(crate) folder_id: Option<Id>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct ActionItemParams {
    pub(crate) task: String,
    pub(crate) owner: Option<String>,
    pub(crate) due_date: Option<String>,
    pub(crate) status: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct UpdateActionItemsParams {
    pub(crate) action_items: Vec<ActionItemParams>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct SmartSummaryParams {
    /// One of "executive", "detailed", "decisions", "persona"; anything else
    /// yields the generic summary view
    pub(crate) mode: String,
    pub(crate) persona_name: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct CalendarSyncParams {
    /// Existing calendar event to merge into; omitted to create a new event
    pub(crate) event_id: Option<String>,
    pub(crate) start_time: Option<String>,
    pub(crate) end_time: Option<String>,
}
