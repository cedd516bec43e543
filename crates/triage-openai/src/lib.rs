// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI classification backend for the Triage ticket tracker.
//!
//! This crate implements [`ClassificationBackend`] over the OpenAI chat
//! completions API in JSON mode. The assistant message content is decoded as
//! JSON and handed back unvalidated; validation is the engine's job.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};
use triage_config::model::ClassifierConfig;
use triage_core::types::HealthStatus;
use triage_core::{
    BackendOutcome, BackendRequest, ClassificationBackend, PluginAdapter, TriageError,
};

use crate::client::{CompletionError, OpenAiClient};
use crate::types::{ChatMessage, ChatRequest, ResponseFormat};

/// Environment variable consulted when `classifier.api_key` is unset.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// OpenAI backend implementing [`ClassificationBackend`].
///
/// API key resolution order: config -> `OPENAI_API_KEY` env var -> error.
pub struct OpenAiBackend {
    client: OpenAiClient,
}

impl OpenAiBackend {
    /// Creates a backend from the classifier configuration.
    pub fn new(config: &ClassifierConfig) -> Result<Self, TriageError> {
        let api_key = resolve_api_key(&config.api_key)?;
        let client = OpenAiClient::new(
            &api_key,
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )?;
        info!(
            model = %config.model,
            endpoint = client.endpoint(),
            "OpenAI backend initialized"
        );
        Ok(Self { client })
    }

    /// Creates a backend around an existing client.
    pub fn with_client(client: OpenAiClient) -> Self {
        Self { client }
    }

    fn to_chat_request(request: &BackendRequest) -> ChatRequest {
        ChatRequest {
            model: request.model.clone(),
            messages: vec![
                ChatMessage::system(request.system_prompt.clone()),
                ChatMessage::user(request.user_content.clone()),
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            response_format: Some(ResponseFormat::json_object()),
        }
    }
}

#[async_trait]
impl PluginAdapter for OpenAiBackend {
    fn name(&self) -> &str {
        "openai"
    }

    async fn health_check(&self) -> Result<HealthStatus, TriageError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ClassificationBackend for OpenAiBackend {
    async fn classify(&self, request: BackendRequest) -> BackendOutcome {
        let chat_request = Self::to_chat_request(&request);
        let response = match self.client.chat_completion(&chat_request).await {
            Ok(response) => response,
            Err(CompletionError::Decode(e)) => {
                return BackendOutcome::ParseError(format!("malformed completion body: {e}"));
            }
            Err(e) => return BackendOutcome::TransportError(e.to_string()),
        };

        if let Some(usage) = response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "completion usage"
            );
        }

        match response.first_content() {
            Some(content) => match serde_json::from_str(content) {
                Ok(value) => BackendOutcome::Success(value),
                Err(e) => BackendOutcome::ParseError(format!(
                    "Invalid JSON response from OpenAI: {e}"
                )),
            },
            None => BackendOutcome::ParseError("completion contained no message content".into()),
        }
    }
}

/// Resolves the API key from config or environment.
fn resolve_api_key(config_key: &Option<String>) -> Result<String, TriageError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(key.clone());
    }

    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|key| !key.is_empty())
        .ok_or_else(|| {
            TriageError::Config(format!(
                "OpenAI API key not found. Set classifier.api_key in config or {API_KEY_ENV} environment variable."
            ))
        })
}
