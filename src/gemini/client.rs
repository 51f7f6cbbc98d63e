//! REST implementation of [`GenerativeClient`] over reqwest.

use async_trait::async_trait;
use tracing::debug;

use crate::config::Config;

use super::wire::{
    Content, EmptyObject, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Tool,
};
use super::{GeminiError, GenerateRequest, GenerateResponse, GenerativeClient};

/// Client for the hosted `generateContent` endpoint.
///
/// No request timeout is configured at this layer; a hung upstream call hangs
/// the corresponding user action.
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn build_body(&self, request: &GenerateRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::user_text(request.prompt.clone())],
            system_instruction: request
                .system_instruction
                .clone()
                .map(Content::system_text),
            tools: request.grounded.then(|| {
                vec![Tool {
                    google_search: EmptyObject {},
                }]
            }),
            generation_config: request.response_schema.clone().map(|schema| {
                GenerationConfig {
                    response_mime_type: "application/json".to_string(),
                    response_schema: schema,
                }
            }),
        }
    }
}

#[async_trait]
impl GenerativeClient for GeminiClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, GeminiError> {
        let body = self.build_body(request);
        debug!(
            model = %self.model,
            grounded = request.grounded,
            structured = request.response_schema.is_some(),
            "sending generateContent request"
        );

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or(GeminiError::EmptyResponse)?;

        let text = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();
        if text.is_empty() {
            return Err(GeminiError::EmptyResponse);
        }

        // Citation URIs, deduplicated by exact match in first-occurrence order.
        let mut sources: Vec<String> = Vec::new();
        if let Some(metadata) = candidate.grounding_metadata {
            for chunk in metadata.grounding_chunks {
                if let Some(uri) = chunk.web.and_then(|web| web.uri) {
                    if !uri.is_empty() && !sources.contains(&uri) {
                        sources.push(uri);
                    }
                }
            }
        }

        Ok(GenerateResponse { text, sources })
    }
}
