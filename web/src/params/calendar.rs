use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct ListEventsParams {
    /// RFC3339 lower bound; defaults to now
    pub(crate) start: Option<String>,
    /// RFC3339 upper bound
    pub(crate) end: Option<String>,
    pub(crate) max_results: Option<u32>,
}
