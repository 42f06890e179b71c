//! Prose summarization of meeting transcripts.

use crate::error::Error;
use crate::gateway::chat::ChatClient;

/// Generate a concise markdown summary of the transcript. The chat output is
/// returned verbatim; failures propagate to the caller's isolation policy.
pub async fn generate(chat: &ChatClient, transcript: &str) -> Result<String, Error> {
    let prompt = format!(
        "You are an expert meeting summarizer. \
         Given the following transcript, produce a clear, concise summary in markdown. \
         Focus on key decisions, topics discussed, and outcomes.\n\n\
         Transcript:\n{transcript}"
    );

    chat.complete(&prompt).await
}
