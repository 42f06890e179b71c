//! Audio-to-artifacts enrichment pipeline.
//!
//! Turning an uploaded recording into transcript, summary, and action items
//! is strictly best-effort: a recording has standalone value even when the AI
//! backend is unreachable or a credential has run dry, so no failure in this
//! module may surface to the upload request. Meeting creation always
//! proceeds with whatever artifacts are available.

use crate::action_items::{self, ActionItem};
use crate::gateway::chat::ChatClient;
use crate::gateway::speech::SpeechClient;
use crate::summary;
use log::*;

/// Artifacts derived from one uploaded recording.
#[derive(Debug, Default, PartialEq)]
pub struct Enrichment {
    /// Empty when transcription was unavailable
    pub transcript: String,
    pub summary: Option<String>,
    pub action_items: Vec<ActionItem>,
}

/// Run transcription, then summary generation and action-item extraction
/// concurrently over the resulting transcript.
///
/// Transcription failure yields the empty enrichment. When transcription
/// succeeds but either downstream generator fails, both generator outputs
/// are discarded: the stored summary and action items must always come from
/// the same successful generation pass, never a mix of one fresh artifact
/// and one lost to a transient fault.
pub async fn run(
    chat: &ChatClient,
    speech: &SpeechClient,
    audio: Vec<u8>,
    filename: &str,
) -> Enrichment {
    let transcript = match speech.transcribe(audio, filename).await {
        Ok(transcript) => transcript,
        Err(e) => {
            warn!("Transcription failed; storing audio without AI artifacts: {e:?}");
            return Enrichment::default();
        }
    };

    let (summary, items) = match tokio::join!(
        summary::generate(chat, &transcript),
        action_items::extract(chat, &transcript),
    ) {
        (Ok(summary), Ok(items)) => (Some(summary), items),
        (summary, items) => {
            warn!(
                "Discarding enrichment pair (summary ok: {}, action items ok: {})",
                summary.is_ok(),
                items.is_ok()
            );
            (None, Vec::new())
        }
    };

    Enrichment {
        transcript,
        summary,
        action_items: items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, ServerGuard};
    use serde_json::json;
    use std::time::Duration;

    fn clients(server: &ServerGuard) -> (ChatClient, SpeechClient) {
        let chat =
            ChatClient::new("key", &server.url(), "chat-model", Duration::from_secs(5)).unwrap();
        let speech =
            SpeechClient::new("key", &server.url(), "stt-model", Duration::from_secs(5)).unwrap();
        (chat, speech)
    }

    fn chat_reply(content: &str) -> String {
        json!({"choices": [{"message": {"role": "assistant", "content": content}}]}).to_string()
    }

    // The two fanned-out chat calls hit the same endpoint; their prompts are
    // told apart by a distinctive phrase each prompt contains.
    const SUMMARY_PROMPT_MARKER: &str = "expert meeting summarizer";
    const ACTION_PROMPT_MARKER: &str = "ACTION ITEMS";

    #[tokio::test]
    async fn test_full_pipeline_produces_all_artifacts() {
        let mut server = mockito::Server::new_async().await;
        let _stt = server
            .mock("POST", "/audio/transcriptions")
            .with_status(200)
            .with_body("We decided to launch Friday. Alice will prepare the deck by Wednesday.")
            .create_async()
            .await;
        let _summary = server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::Regex(SUMMARY_PROMPT_MARKER.to_string()))
            .with_status(200)
            .with_body(chat_reply("Launch is set for Friday."))
            .create_async()
            .await;
        let _actions = server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::Regex(ACTION_PROMPT_MARKER.to_string()))
            .with_status(200)
            .with_body(chat_reply(
                &json!([{
                    "task": "Prepare the deck",
                    "owner": "Alice",
                    "due_date": "2024-01-17",
                    "status": "open"
                }])
                .to_string(),
            ))
            .create_async()
            .await;

        let (chat, speech) = clients(&server);
        let enrichment = run(&chat, &speech, vec![0u8; 16], "m.wav").await;

        assert_eq!(
            enrichment.transcript,
            "We decided to launch Friday. Alice will prepare the deck by Wednesday."
        );
        assert_eq!(enrichment.summary.as_deref(), Some("Launch is set for Friday."));
        assert_eq!(enrichment.action_items.len(), 1);
        assert_eq!(enrichment.action_items[0].task, "Prepare the deck");
        assert_eq!(enrichment.action_items[0].owner.as_deref(), Some("Alice"));
    }

    #[tokio::test]
    async fn test_transcription_failure_degrades_to_empty_enrichment() {
        let mut server = mockito::Server::new_async().await;
        let _stt = server
            .mock("POST", "/audio/transcriptions")
            .with_status(401)
            .with_body("invalid api key")
            .create_async()
            .await;
        // No chat mock: the fan-out stage must never run when transcription
        // fails, and an unexpected chat call would error anyway.

        let (chat, speech) = clients(&server);
        let enrichment = run(&chat, &speech, vec![0u8; 16], "m.wav").await;

        assert_eq!(enrichment, Enrichment::default());
    }

    #[tokio::test]
    async fn test_summary_failure_discards_action_items_too() {
        let mut server = mockito::Server::new_async().await;
        let _stt = server
            .mock("POST", "/audio/transcriptions")
            .with_status(200)
            .with_body("A transcript.")
            .create_async()
            .await;
        let _summary = server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::Regex(SUMMARY_PROMPT_MARKER.to_string()))
            .with_status(429)
            .with_body("quota exceeded")
            .create_async()
            .await;
        let _actions = server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::Regex(ACTION_PROMPT_MARKER.to_string()))
            .with_status(200)
            .with_body(chat_reply(&json!([{"task": "Kept? No."}]).to_string()))
            .create_async()
            .await;

        let (chat, speech) = clients(&server);
        let enrichment = run(&chat, &speech, vec![0u8; 16], "m.wav").await;

        // Action-item extraction itself succeeded, but the pair is
        // all-or-nothing.
        assert_eq!(enrichment.transcript, "A transcript.");
        assert_eq!(enrichment.summary, None);
        assert!(enrichment.action_items.is_empty());
    }

    #[tokio::test]
    async fn test_action_item_failure_discards_summary_too() {
        let mut server = mockito::Server::new_async().await;
        let _stt = server
            .mock("POST", "/audio/transcriptions")
            .with_status(200)
            .with_body("A transcript.")
            .create_async()
            .await;
        let _summary = server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::Regex(SUMMARY_PROMPT_MARKER.to_string()))
            .with_status(200)
            .with_body(chat_reply("A fine summary."))
            .create_async()
            .await;
        let _actions = server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::Regex(ACTION_PROMPT_MARKER.to_string()))
            .with_status(500)
            .with_body("backend exploded")
            .create_async()
            .await;

        let (chat, speech) = clients(&server);
        let enrichment = run(&chat, &speech, vec![0u8; 16], "m.wav").await;

        assert_eq!(enrichment.summary, None);
        assert!(enrichment.action_items.is_empty());
    }

    #[tokio::test]
    async fn test_unparseable_action_reply_is_not_a_failure() {
        let mut server = mockito::Server::new_async().await;
        let _stt = server
            .mock("POST", "/audio/transcriptions")
            .with_status(200)
            .with_body("A transcript.")
            .create_async()
            .await;
        let _summary = server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::Regex(SUMMARY_PROMPT_MARKER.to_string()))
            .with_status(200)
            .with_body(chat_reply("A fine summary."))
            .create_async()
            .await;
        let _actions = server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::Regex(ACTION_PROMPT_MARKER.to_string()))
            .with_status(200)
            .with_body(chat_reply("Sorry, I cannot produce JSON today."))
            .create_async()
            .await;

        let (chat, speech) = clients(&server);
        let enrichment = run(&chat, &speech, vec![0u8; 16], "m.wav").await;

        // The extraction call succeeded with nonsense output, which parses
        // to an empty list; the summary is kept.
        assert_eq!(enrichment.summary.as_deref(), Some("A fine summary."));
        assert!(enrichment.action_items.is_empty());
    }
}
