//! Chat completion client for the hosted LLM provider.
//!
//! Speaks the OpenAI-compatible `/chat/completions` wire format; the base URL
//! is configurable so any compatible provider can stand in.

use crate::error::{DomainErrorKind, Error, ExternalErrorKind, InternalErrorKind};
use crate::gateway::body_excerpt;
use log::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat completion API client
pub struct ChatClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl ChatClient {
    /// Create a new chat client with the given API key, base URL, model, and
    /// per-request timeout
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

    /// Send a single prompt to the chat backend and return the generated text.
    pub async fn complete(&self, prompt: &str) -> Result<String, Error> {
        let url = format!("{}/chat/completions", self.base_url);

        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.2,
        };

        debug!("Sending chat completion request ({} prompt chars)", prompt.len());

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to reach chat backend: {:?}", e);
                Error::from(e)
            })?;

        let status = response.status();
        if status.is_success() {
            let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
                warn!("Failed to parse chat completion response: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Other(
                        "Invalid response from chat backend".to_string(),
                    )),
                }
            })?;

            let message = completion.choices.into_iter().next().ok_or_else(|| Error {
                source: None,
                error_kind: DomainErrorKind::External(ExternalErrorKind::Other(
                    "Chat response did not contain any choices".to_string(),
                )),
            })?;

            Ok(message.message.content.unwrap_or_default())
        } else {
            let body = body_excerpt(&response.text().await.unwrap_or_default());
            error!("Chat backend error {}: {}", status, body);
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
    use serde_json::json;

    fn client(base_url: &str) -> ChatClient {
        ChatClient::new("test_key", base_url, "test-model", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_complete_returns_message_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test_key")
            .with_status(200)
            .with_body(
                json!({
                    "choices": [{"message": {"role": "assistant", "content": "A summary."}}]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let text = client(&server.url()).complete("Summarize this").await.unwrap();
        assert_eq!(text, "A summary.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_maps_non_success_to_upstream_with_excerpt() {
        let mut server = mockito::Server::new_async().await;
        let long_body = "quota exhausted ".repeat(50);
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body(&long_body)
            .create_async()
            .await;

        let err = client(&server.url()).complete("hi").await.unwrap_err();
        match err.error_kind {
            DomainErrorKind::External(ExternalErrorKind::Upstream { status, body }) => {
                assert_eq!(status, 429);
                assert_eq!(body.chars().count(), 200);
            }
            other => panic!("expected Upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_complete_without_choices_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(json!({"choices": []}).to_string())
            .create_async()
            .await;

        let err = client(&server.url()).complete("hi").await.unwrap_err();
        assert!(matches!(
            err.error_kind,
            DomainErrorKind::External(ExternalErrorKind::Other(_))
        ));
    }
}
