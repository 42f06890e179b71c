//! Question answering over the owner's recent meetings.
//!
//! The model is asked to answer from a bounded context of recent meeting
//! summaries and to cite the meetings it used. Cited ids are reconciled
//! against the owner's records; ids the model invented are silently dropped.

use crate::error::Error;
use crate::extract;
use crate::gateway;
use entity::meetings::Model as Meeting;
use entity::Id;
use entity_api::meeting;
use log::*;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use service::config::Config;
use std::collections::HashSet;

/// How many recent meetings are serialized into the question context.
const CONTEXT_MEETING_LIMIT: u64 = 40;

const NO_MEETINGS_ANSWER: &str = "There are no meetings in the system yet.";

/// A meeting the answer is grounded on.
#[derive(Debug, Clone, PartialEq)]
pub struct QaReference {
    pub meeting_id: Id,
    pub title: String,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
}

#[derive(Debug)]
pub struct QaAnswer {
    pub answer: String,
    pub references: Vec<QaReference>,
}

/// Answer a free-text question from the owner's recent meetings.
pub async fn answer(
    db: &DatabaseConnection,
    config: &Config,
    owner_id: Id,
    question: &str,
    api_key: Option<&str>,
) -> Result<QaAnswer, Error> {
    let meetings = meeting::find_recent_by_owner(db, owner_id, CONTEXT_MEETING_LIMIT).await?;

    if meetings.is_empty() {
        return Ok(QaAnswer {
            answer: NO_MEETINGS_ANSWER.to_string(),
            references: Vec::new(),
        });
    }

    let chat = gateway::chat_client(config, api_key)?;
    let raw = chat.complete(&prompt_for(&meetings, question)).await?;

    let (answer, referenced_ids) = parse_reply(&raw);
    if referenced_ids.is_empty() {
        return Ok(QaAnswer {
            answer,
            references: Vec::new(),
        });
    }

    let referenced = meeting::find_by_ids_for_owner(db, owner_id, referenced_ids).await?;
    let references = referenced
        .into_iter()
        .map(|m| QaReference {
            meeting_id: m.id,
            title: m.title,
            created_at: m.created_at,
        })
        .collect();

    Ok(QaAnswer { answer, references })
}

fn context_block(meetings: &[Meeting]) -> String {
    meetings
        .iter()
        .map(|m| {
            format!(
                "- id: {}\n  title: {}\n  created_at: {}\n  summary: {}\n",
                m.id,
                m.title,
                m.created_at.to_rfc3339(),
                m.summary.as_deref().unwrap_or("No summary available."),
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn prompt_for(meetings: &[Meeting], question: &str) -> String {
    format!(
        "You are an assistant that answers questions about past meetings.\n\
         You are given a list of meetings with id, title, created_at, and summary.\n\
         Answer the user's question based ONLY on this context.\n\
         If you truly cannot answer from the data, say you don't know.\n\
         Respond in JSON with this exact shape:\n\
         {{\n  \"answer\": \"short markdown answer\",\n  \"references\": [ {{ \"meeting_id\": \"...\" }}, ... ]\n}}\n\n\
         Meetings:\n{}\n\n\
         Question: {}\n",
        context_block(meetings),
        question
    )
}

/// Split a model reply into the answer text and the deduplicated list of
/// referenced meeting ids. An unparseable reply is itself the best available
/// answer, with no references.
fn parse_reply(raw: &str) -> (String, Vec<Id>) {
    let value = match extract::extract_json(raw) {
        Ok(value) => value,
        Err(_) => {
            debug!("Q&A reply was not parseable JSON; returning raw text");
            return (raw.to_string(), Vec::new());
        }
    };

    let answer = value
        .get("answer")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|answer| !answer.is_empty())
        .unwrap_or(raw)
        .to_string();

    let mut seen = HashSet::new();
    let ids = value
        .get("references")
        .and_then(Value::as_array)
        .map(|references| {
            references
                .iter()
                .filter_map(|reference| reference.get("meeting_id"))
                .filter_map(Value::as_str)
                .filter_map(|id| id.parse::<Id>().ok())
                .filter(|id| seen.insert(*id))
                .collect()
        })
        .unwrap_or_default();

    (answer, ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_reply_extracts_answer_and_dedupes_ids() {
        let id_a = Id::new_v4();
        let id_b = Id::new_v4();
        let raw = format!(
            "Here you go: {}",
            json!({
                "answer": "You decided to launch Friday.",
                "references": [
                    {"meeting_id": id_a.to_string()},
                    {"meeting_id": id_a.to_string()},
                    {"meeting_id": id_b.to_string()},
                    {"meeting_id": "not-a-uuid"},
                    {"unrelated": true}
                ]
            })
        );

        let (answer, ids) = parse_reply(&raw);
        assert_eq!(answer, "You decided to launch Friday.");
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&id_a));
        assert!(ids.contains(&id_b));
    }

    #[test]
    fn test_parse_reply_unparseable_returns_raw_text() {
        let raw = "The launch is on Friday, as discussed in your planning call.";
        let (answer, ids) = parse_reply(raw);
        assert_eq!(answer, raw);
        assert!(ids.is_empty());
    }

    #[test]
    fn test_parse_reply_blank_answer_falls_back_to_raw() {
        let raw = json!({"answer": "  ", "references": []}).to_string();
        let (answer, ids) = parse_reply(&raw);
        assert_eq!(answer, raw);
        assert!(ids.is_empty());
    }

    #[test]
    fn test_no_meetings_answer_is_canned() {
        assert_eq!(NO_MEETINGS_ANSWER, "There are no meetings in the system yet.");
    }
}
