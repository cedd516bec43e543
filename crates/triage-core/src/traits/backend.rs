// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classification backend trait for external LLM integrations.

use async_trait::async_trait;

use crate::traits::adapter::PluginAdapter;

/// A structured classification request.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendRequest {
    /// System instructions, including the category vocabulary.
    pub system_prompt: String,
    /// The ticket text (subject, body, status).
    pub user_content: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Result of a single backend invocation.
///
/// Failures are plain data so the engine's fallback path is a match arm
/// rather than an error handler.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendOutcome {
    /// The backend answered with a JSON payload (not yet validated).
    Success(serde_json::Value),
    /// The request could not be completed (network, HTTP status, timeout).
    TransportError(String),
    /// The backend answered but the body could not be decoded as JSON.
    ParseError(String),
}

/// Adapter for an external classification service.
#[async_trait]
pub trait ClassificationBackend: PluginAdapter {
    /// Sends a classification request. Never panics and never returns `Err`;
    /// every failure is reported through [`BackendOutcome`].
    async fn classify(&self, request: BackendRequest) -> BackendOutcome;
}
