//! HTTP clients for the external AI and calendar backends.

pub mod calendar;
pub mod chat;
pub mod speech;

use crate::error::{DomainErrorKind, Error, ExternalErrorKind};
use entity::users;
use log::*;
use service::config::Config;
use std::time::Duration;

/// How much of an upstream error body is kept in the error we surface.
const ERROR_BODY_EXCERPT_CHARS: usize = 200;

/// Resolve the API credential for an AI call: the caller-supplied per-request
/// value wins, then the process-wide default from configuration.
pub fn resolve_api_key(explicit: Option<&str>, config: &Config) -> Result<String, Error> {
    if let Some(key) = explicit.map(str::trim).filter(|k| !k.is_empty()) {
        return Ok(key.to_string());
    }

    if let Some(key) = config.llm_api_key() {
        let key = key.trim();
        if !key.is_empty() {
            return Ok(key.to_string());
        }
    }

    warn!("No LLM API key provided by the caller or the server configuration");
    Err(Error {
        source: None,
        error_kind: DomainErrorKind::External(ExternalErrorKind::NoCredential),
    })
}

/// Build a chat client against the configured LLM provider.
pub fn chat_client(config: &Config, explicit_key: Option<&str>) -> Result<chat::ChatClient, Error> {
    let api_key = resolve_api_key(explicit_key, config)?;
    chat::ChatClient::new(
        &api_key,
        config.llm_api_base(),
        config.llm_model_name(),
        Duration::from_secs(config.chat_timeout_secs),
    )
}

/// Build a transcription client against the configured speech-to-text provider.
pub fn speech_client(
    config: &Config,
    explicit_key: Option<&str>,
) -> Result<speech::SpeechClient, Error> {
    let api_key = resolve_api_key(explicit_key, config)?;
    speech::SpeechClient::new(
        &api_key,
        config.llm_api_base(),
        config.stt_model_name(),
        Duration::from_secs(config.transcription_timeout_secs),
    )
}

/// Build a calendar client using the user's stored OAuth access token.
/// Token acquisition and refresh are handled by the account provisioning
/// flow; a user without a token simply has no calendar connected.
pub fn calendar_client(
    config: &Config,
    user: &users::Model,
) -> Result<calendar::CalendarClient, Error> {
    let token = user
        .calendar_access_token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            warn!("User {} has no calendar connected", user.id);
            Error {
                source: None,
                error_kind: DomainErrorKind::External(ExternalErrorKind::NoCredential),
            }
        })?;

    calendar::CalendarClient::new(token, config.calendar_api_base())
}

/// Truncate an upstream error body to a loggable excerpt.
pub(crate) fn body_excerpt(body: &str) -> String {
    body.chars().take(ERROR_BODY_EXCERPT_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_excerpt_truncates_long_bodies() {
        let body = "x".repeat(500);
        assert_eq!(body_excerpt(&body).len(), 200);
    }

    #[test]
    fn test_body_excerpt_keeps_short_bodies() {
        assert_eq!(body_excerpt("quota exceeded"), "quota exceeded");
    }
}
