//! Speech-to-text client for the hosted transcription provider.
//!
//! Uses the OpenAI-compatible `/audio/transcriptions` multipart endpoint with
//! `response_format=text`, so a successful response body is the transcript
//! itself.

use crate::error::{DomainErrorKind, Error, ExternalErrorKind, InternalErrorKind};
use crate::gateway::body_excerpt;
use log::*;
use std::time::Duration;

/// Transcription API client
pub struct SpeechClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl SpeechClient {
    /// Create a new transcription client. The timeout should be generous:
    /// audio payloads are large and slow to process upstream.
    pub fn new(
        api_key: &str,
        base_url: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let mut headers = reqwest::header::HeaderMap::new();

        let auth_value = format!("Bearer {}", api_key);
        let mut header_value =
            reqwest::header::HeaderValue::from_str(&auth_value).map_err(|e| {
                warn!("Failed to create auth header: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                        "Invalid API key format".to_string(),
                    )),
                }
            })?;
        header_value.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, header_value);

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    /// Transcribe an audio payload and return the raw transcript text.
    pub async fn transcribe(&self, audio: Vec<u8>, filename: &str) -> Result<String, Error> {
        let url = format!("{}/audio/transcriptions", self.base_url);

        debug!("Transcribing audio file {} ({} bytes)", filename, audio.len());

        let file_part = reqwest::multipart::Part::bytes(audio)
            .file_name(filename.to_string())
            .mime_str("audio/wav")
            .map_err(|e| {
                warn!("Failed to build multipart body: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                        "Failed to build multipart body".to_string(),
                    )),
                }
            })?;

        let form = reqwest::multipart::Form::new()
            .text("model", self.model.clone())
            .text("response_format", "text")
            .part("file", file_part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to reach transcription backend: {:?}", e);
                Error::from(e)
            })?;

        let status = response.status();
        if status.is_success() {
            // With response_format=text the body is the plain transcript
            Ok(response.text().await.map_err(Error::from)?)
        } else {
            let body = body_excerpt(&response.text().await.unwrap_or_default());
            error!("Transcription backend error {}: {}", status, body);
            Err(Error {
                source: None,
                error_kind: DomainErrorKind::External(ExternalErrorKind::Upstream {
                    status: status.as_u16(),
                    body,
                }),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> SpeechClient {
        SpeechClient::new("test_key", base_url, "stt-model", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_transcribe_returns_plain_text_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/audio/transcriptions")
            .match_header("authorization", "Bearer test_key")
            .with_status(200)
            .with_body("We decided to launch Friday.")
            .create_async()
            .await;

        let transcript = client(&server.url())
            .transcribe(vec![0u8; 16], "meeting.wav")
            .await
            .unwrap();
        assert_eq!(transcript, "We decided to launch Friday.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_transcribe_maps_non_success_to_upstream() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/audio/transcriptions")
            .with_status(500)
            .with_body("internal error")
            .create_async()
            .await;

        let err = client(&server.url())
            .transcribe(vec![0u8; 16], "meeting.wav")
            .await
            .unwrap_err();
        assert!(matches!(
            err.error_kind,
            DomainErrorKind::External(ExternalErrorKind::Upstream { status: 500, .. })
        ));
    }
}
