use axum::http::HeaderMap;
use serde::Serialize;

pub(crate) mod assistant_controller;
pub(crate) mod calendar_controller;
pub(crate) mod folder_controller;
pub(crate) mod health_check_controller;
pub(crate) mod meeting;
pub(crate) mod meeting_controller;

/// Header carrying an optional per-request LLM API key that overrides the
/// process-wide default credential.
pub(crate) const LLM_API_KEY_HEADER: &str = "x-llm-api-key";

pub(crate) fn llm_api_key_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get(LLM_API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status_code: u16, data: T) -> Self {
        Self {
            status_code,
            data: Some(data),
        }
    }

    pub fn no_content(status_code: u16) -> ApiResponse<()> {
        ApiResponse {
            status_code,
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_serialize_api_response_with_some() {
        let response = ApiResponse {
            status_code: StatusCode::OK.into(),
            data: Some(23),
        };
        let serialized = serde_json::to_string(&response).unwrap();

        // Serializing and then deserializing because the string output from serde_json::to_string is
        // non-deterministic as far as the order of the JSON keys. This ensures the test won't be flaky
        let deserialized_value: serde_json::Value = serde_json::from_str(&serialized).unwrap();
        let deserialized_expected_value: serde_json::Value =
            json!({"data": 23, "status_code": 200});
        assert_eq!(deserialized_value, deserialized_expected_value);
    }

    #[tokio::test]
    async fn test_serialize_api_response_with_none() {
        let response = ApiResponse::<()>::no_content(StatusCode::NO_CONTENT.into());
        // No need to deserialize here because there's only one key
        let serialized = serde_json::to_string(&response).unwrap();
        assert_eq!(serialized, json!({"status_code": 204}).to_string());
    }

    #[test]
    fn test_llm_api_key_header_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(llm_api_key_header(&headers), None);

        headers.insert(LLM_API_KEY_HEADER, "sk-test".parse().unwrap());
        assert_eq!(llm_api_key_header(&headers), Some("sk-test".to_string()));
    }
}
