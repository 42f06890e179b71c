//! Response DTOs for the AI assistant endpoints.

use chrono::{DateTime, FixedOffset};
use domain::qa::QaAnswer;
use domain::topics::TopicCluster;
use domain::Id;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct SmartSummaryResponse {
    pub summary: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QaReferenceResponse {
    pub meeting_id: Id,
    pub title: String,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<FixedOffset>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QaResponse {
    pub answer: String,
    pub references: Vec<QaReferenceResponse>,
}

impl From<QaAnswer> for QaResponse {
    fn from(answer: QaAnswer) -> Self {
        Self {
            answer: answer.answer,
            references: answer
                .references
                .into_iter()
                .map(|reference| QaReferenceResponse {
                    meeting_id: reference.meeting_id,
                    title: reference.title,
                    created_at: reference.created_at,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TopicClustersResponse {
    #[schema(value_type = Vec<Object>)]
    pub clusters: Vec<TopicCluster>,
}
