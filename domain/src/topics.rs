//! Topic clustering across the owner's recent meetings.
//!
//! Unlike Q&A references, cluster membership is taken at the model's word:
//! ids are coerced to text and kept verbatim with no existence check. Only
//! clusters without a usable name are dropped.

use crate::error::Error;
use crate::extract;
use crate::gateway;
use entity::meetings::Model as Meeting;
use entity::Id;
use entity_api::meeting;
use log::*;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::Value;
use service::config::Config;

/// How many recent meetings are serialized into the clustering context.
const CONTEXT_MEETING_LIMIT: u64 = 50;

/// A named group of related meetings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicCluster {
    pub name: String,
    pub description: Option<String>,
    pub meeting_ids: Vec<String>,
}

/// Group the owner's recent meetings into high-level topics.
pub async fn cluster(
    db: &DatabaseConnection,
    config: &Config,
    owner_id: Id,
    api_key: Option<&str>,
) -> Result<Vec<TopicCluster>, Error> {
    let meetings = meeting::find_recent_by_owner(db, owner_id, CONTEXT_MEETING_LIMIT).await?;

    if meetings.is_empty() {
        return Ok(Vec::new());
    }

    let chat = gateway::chat_client(config, api_key)?;
    let raw = chat.complete(&prompt_for(&meetings)).await?;

    Ok(parse_clusters(&raw))
}

fn prompt_for(meetings: &[Meeting]) -> String {
    let context = meetings
        .iter()
        .map(|m| {
            format!(
                "- id: {}\n  title: {}\n  created_at: {}\n  summary: {}\n",
                m.id,
                m.title,
                m.created_at.to_rfc3339(),
                m.summary.as_deref().unwrap_or("No summary"),
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "You are an assistant that groups related meetings into topics.\n\
         Given the list of meetings below, create 3-8 coherent clusters.\n\
         Respond ONLY as JSON with this shape:\n\
         {{ \"clusters\": [\n  {{\n    \"name\": \"Short topic name\",\n    \"description\": \"Optional one-sentence description\",\n    \"meeting_ids\": [\"id1\", \"id2\", ...]\n  }},\n  ...\n]}}\n\n\
         Meetings:\n{context}\n"
    )
}

/// Parse a model reply into clusters. Extraction failure yields an empty
/// list; candidate clusters with a blank name are dropped.
pub fn parse_clusters(raw: &str) -> Vec<TopicCluster> {
    let value = match extract::extract_json(raw) {
        Ok(value) => value,
        Err(_) => {
            debug!("Topic reply was not parseable JSON; returning no clusters");
            return Vec::new();
        }
    };

    let Some(clusters) = value.get("clusters").and_then(Value::as_array) else {
        return Vec::new();
    };

    clusters.iter().filter_map(cluster_from_value).collect()
}

fn cluster_from_value(value: &Value) -> Option<TopicCluster> {
    let object = value.as_object()?;

    let name = object
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim();
    if name.is_empty() {
        return None;
    }

    let meeting_ids = object
        .get("meeting_ids")
        .and_then(Value::as_array)
        .map(|ids| {
            ids.iter()
                .filter_map(|id| match id {
                    Value::String(id) => Some(id.clone()),
                    Value::Number(id) => Some(id.to_string()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    Some(TopicCluster {
        name: name.to_string(),
        description: object
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string),
        meeting_ids,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_clusters_drops_blank_names_and_keeps_empty_id_lists() {
        let raw = json!({
            "clusters": [
                {"name": "", "meeting_ids": ["a"]},
                {"name": "   ", "meeting_ids": ["b"]},
                {"name": "Planning", "description": "Roadmap talks", "meeting_ids": []},
                {"name": "Hiring", "meeting_ids": ["m1", 42, true, "m2"]}
            ]
        })
        .to_string();

        let clusters = parse_clusters(&raw);
        assert_eq!(clusters.len(), 2);

        assert_eq!(clusters[0].name, "Planning");
        assert_eq!(clusters[0].description.as_deref(), Some("Roadmap talks"));
        assert!(clusters[0].meeting_ids.is_empty());

        // Ids are coerced to text; non-scalar junk is dropped.
        assert_eq!(clusters[1].meeting_ids, vec!["m1", "42", "m2"]);
    }

    #[test]
    fn test_parse_clusters_tolerates_surrounding_prose() {
        let raw = format!(
            "Of course! {}",
            json!({"clusters": [{"name": "Ops", "meeting_ids": ["x"]}]})
        );
        let clusters = parse_clusters(&raw);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].name, "Ops");
    }

    #[test]
    fn test_parse_clusters_failure_yields_empty_list() {
        assert!(parse_clusters("no structure here").is_empty());
        assert!(parse_clusters("{\"unexpected\": true}").is_empty());
    }
}
