//! Client for the Gemini `generateContent` API.
//!
//! This module provides a trait-based abstraction over the generative
//! backend, with the hosted REST API as the primary implementation. Two
//! operating modes are exposed: grounded generation (Google-Search tool
//! enabled, citation sources available) and schema-constrained generation
//! (declared response schema, syntactically guaranteed JSON, no sources).

mod client;
mod error;
mod wire;

pub use client::GeminiClient;
pub use error::GeminiError;

use async_trait::async_trait;

/// A single text-generation request.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Free-text user prompt.
    pub prompt: String,
    /// Optional system instruction steering output format and language.
    pub system_instruction: Option<String>,
    /// Enable the live web-search tool (grounded mode).
    pub grounded: bool,
    /// Declared output schema. When set, the response body is forced to be
    /// syntactically valid JSON matching this shape.
    pub response_schema: Option<serde_json::Value>,
}

impl GenerateRequest {
    /// Grounded free-text request (search tool on, no schema).
    pub fn grounded(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_instruction: None,
            grounded: true,
            response_schema: None,
        }
    }

    /// Schema-constrained request (no search, guaranteed-parseable body).
    pub fn structured(prompt: impl Into<String>, schema: serde_json::Value) -> Self {
        Self {
            prompt: prompt.into(),
            system_instruction: None,
            grounded: false,
            response_schema: Some(schema),
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }
}

/// Response consumed by this client: the text payload plus, when grounded,
/// the citation URIs (deduplicated, first-occurrence order).
#[derive(Debug, Clone, Default)]
pub struct GenerateResponse {
    pub text: String,
    pub sources: Vec<String>,
}

/// Trait for generative-text clients.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    /// Send one generation request and return the text payload.
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, GeminiError>;
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted client for exercising the pipelines without the network.

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::{GeminiError, GenerateRequest, GenerateResponse, GenerativeClient};

    /// Replays a fixed sequence of responses and records every request.
    pub(crate) struct ScriptedClient {
        responses: Mutex<VecDeque<Result<GenerateResponse, GeminiError>>>,
        requests: Mutex<Vec<GenerateRequest>>,
    }

    impl ScriptedClient {
        pub(crate) fn new(
            responses: Vec<Result<GenerateResponse, GeminiError>>,
        ) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Text-only successful response helper.
        pub(crate) fn text(text: &str) -> Result<GenerateResponse, GeminiError> {
            Ok(GenerateResponse {
                text: text.to_string(),
                sources: Vec::new(),
            })
        }

        pub(crate) fn failure() -> Result<GenerateResponse, GeminiError> {
            Err(GeminiError::Api {
                status: 503,
                message: "scripted failure".to_string(),
            })
        }

        pub(crate) fn call_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        pub(crate) fn requests(&self) -> Vec<GenerateRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GenerativeClient for ScriptedClient {
        async fn generate(
            &self,
            request: &GenerateRequest,
        ) -> Result<GenerateResponse, GeminiError> {
            self.requests.lock().unwrap().push(request.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| {
                    Err(GeminiError::Api {
                        status: 500,
                        message: "script exhausted".to_string(),
                    })
                })
        }
    }
}
