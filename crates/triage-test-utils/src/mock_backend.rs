// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock classification backend for deterministic testing.
//!
//! `MockBackend` implements `ClassificationBackend` with pre-configured
//! outcomes, enabling fast tests without external API calls.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use triage_core::types::HealthStatus;
use triage_core::{BackendOutcome, BackendRequest, ClassificationBackend, PluginAdapter, TriageError};

/// A mock backend that returns pre-configured outcomes.
///
/// Outcomes are popped from a FIFO queue. When the queue is empty the
/// backend reports a transport error. Every request is recorded.
#[derive(Clone, Default)]
pub struct MockBackend {
    outcomes: Arc<Mutex<VecDeque<BackendOutcome>>>,
    requests: Arc<Mutex<Vec<BackendRequest>>>,
}

impl MockBackend {
    /// Create a mock backend with an empty outcome queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock backend pre-loaded with the given outcomes.
    pub fn with_outcomes(outcomes: Vec<BackendOutcome>) -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(VecDeque::from(outcomes))),
            requests: Arc::default(),
        }
    }

    /// Queue an outcome.
    pub async fn push(&self, outcome: BackendOutcome) {
        self.outcomes.lock().await.push_back(outcome);
    }

    /// Queue a successful JSON payload.
    pub async fn push_json(&self, payload: Value) {
        self.push(BackendOutcome::Success(payload)).await;
    }

    /// Requests received so far, oldest first.
    pub async fn requests(&self) -> Vec<BackendRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait]
impl PluginAdapter for MockBackend {
    fn name(&self) -> &str {
        "mock-backend"
    }

    async fn health_check(&self) -> Result<HealthStatus, TriageError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ClassificationBackend for MockBackend {
    async fn classify(&self, request: BackendRequest) -> BackendOutcome {
        self.requests.lock().await.push(request);
        self.outcomes
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| BackendOutcome::TransportError("mock backend has no queued outcome".into()))
    }
}
