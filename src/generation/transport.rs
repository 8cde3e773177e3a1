use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::generation::error::TransportError;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub instruction: String,
    pub schema: Option<Value>,
}

#[async_trait]
pub trait GenerationTransport: Send + Sync {
    async fn generate(
        &self,
        api_key: &str,
        request: &GenerationRequest,
    ) -> Result<String, TransportError>;
}

/// `generateContent` over HTTPS.
#[derive(Debug, Clone)]
pub struct GeminiTransport {
    http: Client,
    api_base: String,
}

impl GeminiTransport {
    pub fn new(http: Client, api_base: impl Into<String>) -> Self {
        Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_owned(),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.api_base)
    }
}

#[async_trait]
impl GenerationTransport for GeminiTransport {
    async fn generate(
        &self,
        api_key: &str,
        request: &GenerationRequest,
    ) -> Result<String, TransportError> {
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_owned(),
                parts: vec![GeminiPart {
                    text: Some(request.instruction.clone()),
                }],
            }],
            generation_config: request.schema.as_ref().map(|schema| GenerationConfig {
                response_mime_type: "application/json".to_owned(),
                response_schema: schema.clone(),
            }),
        };

        let response = self
            .http
            .post(self.endpoint(&request.model))
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|error| {
                TransportError::new(
                    error.status().map(|status| status.as_u16()),
                    format!("failed to call generation API: {error}"),
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(TransportError::new(
                Some(status.as_u16()),
                format!("generation API returned {status}: {detail}"),
            ));
        }

        let decoded: GeminiResponse = response.json().await.map_err(|error| {
            TransportError::new(
                Some(status.as_u16()),
                format!("failed to decode generation API envelope: {error}"),
            )
        })?;

        Ok(decoded
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Debug, Clone, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Clone, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{GeminiContent, GeminiPart, GeminiRequest, GeminiResponse, GeminiTransport, GenerationConfig};

    #[test]
    fn endpoint_joins_base_and_model() {
        let transport = GeminiTransport::new(reqwest::Client::new(), "https://example.test/v1beta/");
        assert_eq!(
            transport.endpoint("gemini-3-pro-preview"),
            "https://example.test/v1beta/models/gemini-3-pro-preview:generateContent"
        );
    }

    #[test]
    fn request_omits_generation_config_for_markup() {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_owned(),
                parts: vec![GeminiPart {
                    text: Some("hi".to_owned()),
                }],
            }],
            generation_config: None,
        };
        let value = serde_json::to_value(&request).expect("request should serialize");
        assert_eq!(value, json!({ "contents": [{ "role": "user", "parts": [{ "text": "hi" }] }] }));

        let with_schema = GeminiRequest {
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_owned(),
                response_schema: json!({ "type": "OBJECT" }),
            }),
            ..request
        };
        let value = serde_json::to_value(&with_schema).expect("request should serialize");
        assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(value["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn response_envelope_tolerates_missing_parts() {
        let decoded: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "role": "model", "parts": [{ "text": "{\"a\":" }, { "text": "1}" }] } }]
        }))
        .expect("envelope should decode");
        let content = decoded.candidates[0].content.as_ref().expect("content");
        assert_eq!(content.parts.len(), 2);

        let empty: GeminiResponse =
            serde_json::from_value(json!({})).expect("empty envelope should decode");
        assert!(empty.candidates.is_empty());
    }
}
