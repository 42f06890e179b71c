//! Extraction of structured action items from meeting transcripts.
//!
//! The chat backend is asked for a JSON array of tasks; because model output
//! is never guaranteed to be well-formed, parsing is tolerant and a reply
//! that cannot be understood yields an empty list instead of an error.

use crate::error::Error;
use crate::extract;
use crate::gateway::chat::ChatClient;
use log::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status assigned to an item whenever the model or the caller omits one.
pub const DEFAULT_STATUS: &str = "open";

/// A single task extracted from a transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionItem {
    pub task: String,
    pub owner: Option<String>,
    /// Loose date string, stored as given and never validated as a calendar date
    pub due_date: Option<String>,
    pub status: String,
}

impl ActionItem {
    /// Build a well-formed item. Returns `None` for blank tasks, which are
    /// never persisted; a missing or blank status becomes [`DEFAULT_STATUS`].
    pub fn new(
        task: &str,
        owner: Option<String>,
        due_date: Option<String>,
        status: Option<&str>,
    ) -> Option<Self> {
        let task = task.trim();
        if task.is_empty() {
            return None;
        }

        let status = status
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_STATUS);

        Some(ActionItem {
            task: task.to_string(),
            owner,
            due_date,
            status: status.to_string(),
        })
    }
}

fn prompt_for(transcript: &str) -> String {
    format!(
        "You are an assistant that extracts ACTION ITEMS from meeting transcripts.\n\
         Return ONLY valid JSON in this exact format:\n\n\
         [\n  {{\n    \"task\": \"string, the actual action\",\n    \"owner\": \"string or null\",\n    \"due_date\": \"YYYY-MM-DD or null\",\n    \"status\": \"open\"\n  }}\n]\n\n\
         If there are no action items, return an empty list [].\n\n\
         Transcript:\n{transcript}\n"
    )
}

/// Ask the chat backend for the transcript's action items.
///
/// Chat failures propagate to the caller; an unparseable reply degrades to an
/// empty list so that no request ever fails solely because action-item
/// parsing failed.
pub async fn extract(chat: &ChatClient, transcript: &str) -> Result<Vec<ActionItem>, Error> {
    let raw = chat.complete(&prompt_for(transcript)).await?;
    Ok(parse_items(&raw))
}

/// Parse a model reply into well-formed action items. Never fails: anything
/// that is not a JSON array of task objects yields an empty list, and each
/// element is validated individually.
pub fn parse_items(raw: &str) -> Vec<ActionItem> {
    let value = match extract::extract_json(raw) {
        Ok(value) => value,
        Err(_) => {
            debug!("Action item reply was not parseable JSON; returning no items");
            return Vec::new();
        }
    };

    let Value::Array(elements) = value else {
        debug!("Action item reply was valid JSON but not an array; returning no items");
        return Vec::new();
    };

    elements.iter().filter_map(item_from_value).collect()
}

fn item_from_value(value: &Value) -> Option<ActionItem> {
    let object = value.as_object()?;

    ActionItem::new(
        object.get("task").and_then(Value::as_str).unwrap_or_default(),
        string_field(object, "owner"),
        string_field(object, "due_date"),
        object.get("status").and_then(Value::as_str),
    )
}

fn string_field(object: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Decode the serialized meeting column. Tolerant on read: an unreadable
/// column renders as an empty list rather than failing the request.
pub fn from_stored(stored: Option<&str>) -> Vec<ActionItem> {
    let Some(stored) = stored else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<Value>>(stored) {
        Ok(elements) => elements.iter().filter_map(item_from_value).collect(),
        Err(_) => {
            debug!("Stored action items column was unreadable; returning no items");
            Vec::new()
        }
    }
}

/// Encode items for the meeting column.
pub fn to_stored(items: &[ActionItem]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_items_recovers_array_from_prose() {
        let raw = format!(
            "Here are the action items:\n{}\nLet me know if I missed any.",
            json!([{
                "task": "Prepare the deck",
                "owner": "Alice",
                "due_date": "2024-01-17",
                "status": "open"
            }])
        );

        let items = parse_items(&raw);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].task, "Prepare the deck");
        assert_eq!(items[0].owner.as_deref(), Some("Alice"));
        assert_eq!(items[0].due_date.as_deref(), Some("2024-01-17"));
        assert_eq!(items[0].status, "open");
    }

    #[test]
    fn test_parse_items_drops_blank_tasks_and_defaults_status() {
        let raw = json!([
            {"task": "   ", "owner": "Bob"},
            {"task": "Send the notes"},
            {"task": "File the ticket", "status": ""},
            "not an object",
            {"owner": "no task at all"}
        ])
        .to_string();

        let items = parse_items(&raw);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].task, "Send the notes");
        assert_eq!(items[0].status, DEFAULT_STATUS);
        assert_eq!(items[1].task, "File the ticket");
        assert_eq!(items[1].status, DEFAULT_STATUS);
    }

    #[test]
    fn test_parse_items_unparseable_reply_yields_empty_list() {
        assert!(parse_items("I found no action items worth noting.").is_empty());
        assert!(parse_items("[ {\"task\": \"broken").is_empty());
    }

    #[test]
    fn test_parse_items_non_array_json_yields_empty_list() {
        assert!(parse_items("{\"task\": \"an object, not an array\"}").is_empty());
    }

    #[test]
    fn test_stored_round_trip_and_tolerant_read() {
        let items = vec![ActionItem::new("Ship it", None, None, None).unwrap()];
        let stored = to_stored(&items);
        assert_eq!(from_stored(Some(&stored)), items);

        assert!(from_stored(None).is_empty());
        assert!(from_stored(Some("not json at all")).is_empty());
    }
}
