//! Tolerant extraction of JSON embedded in model output.
//!
//! Generation backends routinely wrap structured output in prose, markdown
//! fences, or partial sentences. This module locates the first plausible JSON
//! array or object in a text blob and parses it, reporting a parse failure as
//! its own error kind so that callers can degrade to a fallback result
//! instead of aborting the request.

use crate::error::{DomainErrorKind, Error, ExternalErrorKind};
use serde_json::Value;

/// Extract the first JSON array or object embedded in `text`.
///
/// Scans from the first `[` or `{` to the last matching `]` or `}`; when no
/// opening bracket exists, the whole text is handed to the parser as-is.
pub fn extract_json(text: &str) -> Result<Value, Error> {
    let candidate = json_candidate(text).unwrap_or(text);

    serde_json::from_str(candidate).map_err(|e| Error {
        source: Some(Box::new(e)),
        error_kind: DomainErrorKind::External(ExternalErrorKind::Extraction),
    })
}

/// Slice from the first `[`/`{` to the last closer matching that opener.
fn json_candidate(text: &str) -> Option<&str> {
    let start = text.find(['[', '{'])?;
    let closer = if text.as_bytes()[start] == b'[' { ']' } else { '}' };
    let end = text.rfind(closer)?;

    if end > start {
        Some(&text[start..=end])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_recovers_array_surrounded_by_prose() {
        let raw = "Sure! Here are the items you asked for:\n\n```json\n[{\"task\": \"Ship it\"}]\n```\nLet me know if you need anything else.";

        let value = extract_json(raw).unwrap();
        assert_eq!(value, json!([{"task": "Ship it"}]));
    }

    #[test]
    fn test_recovers_object_surrounded_by_prose() {
        let raw = "The answer is: {\"answer\": \"Friday\", \"references\": []} -- hope that helps";

        let value = extract_json(raw).unwrap();
        assert_eq!(value["answer"], "Friday");
    }

    #[test]
    fn test_object_containing_brackets_in_strings() {
        let raw = "{\"answer\": \"use foo[0] and bar{}\"} trailing";

        let value = extract_json(raw).unwrap();
        assert_eq!(value["answer"], "use foo[0] and bar{}");
    }

    #[test]
    fn test_first_opening_bracket_wins() {
        // The array opens first, so the array is what gets extracted.
        let raw = "list: [1, 2, {\"nested\": true}] done";

        let value = extract_json(raw).unwrap();
        assert_eq!(value, json!([1, 2, {"nested": true}]));
    }

    #[test]
    fn test_unbalanced_brackets_fail_as_extraction() {
        let raw = "Here you go: [ {\"task\": \"oops\" ";

        let err = extract_json(raw).unwrap_err();
        assert_eq!(
            err.error_kind,
            DomainErrorKind::External(ExternalErrorKind::Extraction)
        );
    }

    #[test]
    fn test_no_brackets_parses_whole_text() {
        assert_eq!(extract_json("42").unwrap(), json!(42));
        assert_eq!(extract_json("null").unwrap(), json!(null));
    }

    #[test]
    fn test_no_brackets_and_not_json_fails_as_extraction() {
        let err = extract_json("I could not find any action items.").unwrap_err();
        assert_eq!(
            err.error_kind,
            DomainErrorKind::External(ExternalErrorKind::Extraction)
        );
    }

    #[test]
    fn test_empty_input_fails_as_extraction() {
        assert!(extract_json("").is_err());
    }
}
