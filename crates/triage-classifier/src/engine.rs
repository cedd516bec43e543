// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classification orchestration: gate, call, validate, fall back.
//!
//! When the feature is disabled the engine answers from the fallback
//! classifier without touching the rate limiter. When enabled, every call
//! consumes one rate-limit slot; an exhausted window is the only error a
//! caller ever sees. Backend failures and invalid payloads are logged and
//! replaced by a fallback result.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};
use triage_config::model::ClassifierConfig;
use triage_core::types::{ClassificationResult, RateLimitStatus, Ticket};
use triage_core::{BackendOutcome, BackendRequest, ClassificationBackend, TriageError};

use crate::fallback::{FallbackClassifier, FallbackReason};
use crate::prompt;
use crate::rate_limit::RateLimiter;
use crate::validator;

/// Decides how a ticket gets classified.
pub struct ClassificationEngine {
    settings: ClassifierConfig,
    backend: Option<Arc<dyn ClassificationBackend>>,
    limiter: Arc<RateLimiter>,
    fallback: FallbackClassifier,
}

impl ClassificationEngine {
    /// Build an engine. Without a backend the engine behaves as disabled
    /// regardless of `settings.enabled`.
    pub fn new(
        settings: ClassifierConfig,
        backend: Option<Arc<dyn ClassificationBackend>>,
        limiter: Arc<RateLimiter>,
        fallback: FallbackClassifier,
    ) -> Self {
        if settings.enabled && backend.is_none() {
            warn!("classification enabled but no backend configured; using fallback only");
        }
        Self {
            settings,
            backend,
            limiter,
            fallback,
        }
    }

    /// True when classify calls reach the backend.
    pub fn is_enabled(&self) -> bool {
        self.active_backend().is_some()
    }

    /// Current rate-limit window for the configured key.
    pub fn rate_limit_status(&self) -> RateLimitStatus {
        let rl = &self.settings.rate_limit;
        self.limiter.status(&rl.key, rl.max_calls, rl.window_seconds)
    }

    fn active_backend(&self) -> Option<&Arc<dyn ClassificationBackend>> {
        self.backend.as_ref().filter(|_| self.settings.enabled)
    }

    /// Classify a ticket against a vocabulary snapshot.
    ///
    /// Fails only with [`TriageError::RateLimitExceeded`].
    pub async fn classify(
        &self,
        ticket: &Ticket,
        known_categories: &[String],
    ) -> Result<ClassificationResult, TriageError> {
        let Some(backend) = self.active_backend() else {
            return Ok(self
                .fallback
                .classify(FallbackReason::FeatureDisabled, known_categories));
        };

        let rl = &self.settings.rate_limit;
        if !self.limiter.allow(&rl.key, rl.max_calls, rl.window_seconds) {
            let status = self.rate_limit_status();
            warn!(
                ticket_id = %ticket.id,
                retry_after = status.available_in_seconds,
                "classification rate limit exceeded"
            );
            return Err(TriageError::RateLimitExceeded {
                retry_after_secs: status.available_in_seconds,
            });
        }

        let request = BackendRequest {
            system_prompt: prompt::system_prompt(known_categories),
            user_content: prompt::ticket_content(ticket),
            model: self.settings.model.clone(),
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };
        debug!(
            ticket_id = %ticket.id,
            model = %request.model,
            system = %request.system_prompt,
            user = %request.user_content,
            "classification request"
        );

        let timeout = Duration::from_secs(self.settings.timeout_secs);
        let outcome = match tokio::time::timeout(timeout, backend.classify(request)).await {
            Ok(outcome) => outcome,
            Err(_) => BackendOutcome::TransportError(format!(
                "backend call timed out after {}s",
                timeout.as_secs()
            )),
        };

        match outcome {
            BackendOutcome::Success(raw) => match validator::parse_valid(&raw, known_categories) {
                Some(result) => {
                    info!(
                        ticket_id = %ticket.id,
                        category = %result.category,
                        confidence = result.confidence,
                        "ticket classified by backend"
                    );
                    Ok(result)
                }
                None => {
                    warn!(
                        ticket_id = %ticket.id,
                        response = %raw,
                        "invalid classification response"
                    );
                    Ok(self
                        .fallback
                        .classify(FallbackReason::InvalidResponse, known_categories))
                }
            },
            BackendOutcome::TransportError(message) | BackendOutcome::ParseError(message) => {
                error!(
                    ticket_id = %ticket.id,
                    error = %message,
                    "backend classification failed"
                );
                Ok(self
                    .fallback
                    .classify(FallbackReason::UpstreamError, known_categories))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;
    use tracing_test::traced_test;
    use triage_core::types::{ClassificationSource, HealthStatus};
    use triage_core::{PluginAdapter, TicketStatus};

    struct ScriptedBackend {
        outcomes: Mutex<VecDeque<BackendOutcome>>,
        delay: Option<Duration>,
        calls: Mutex<Vec<BackendRequest>>,
    }

    impl ScriptedBackend {
        fn new(outcomes: Vec<BackendOutcome>) -> Arc<Self> {
            Arc::new(Self {
                outcomes: Mutex::new(outcomes.into()),
                delay: None,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn slow(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                outcomes: Mutex::new(VecDeque::new()),
                delay: Some(delay),
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl PluginAdapter for ScriptedBackend {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn health_check(&self) -> Result<HealthStatus, TriageError> {
            Ok(HealthStatus::Healthy)
        }
    }

    #[async_trait]
    impl ClassificationBackend for ScriptedBackend {
        async fn classify(&self, request: BackendRequest) -> BackendOutcome {
            self.calls.lock().unwrap().push(request);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| BackendOutcome::TransportError("script exhausted".into()))
        }
    }

    fn settings(enabled: bool, max_calls: u32) -> ClassifierConfig {
        let mut settings = ClassifierConfig {
            enabled,
            ..ClassifierConfig::default()
        };
        settings.rate_limit.max_calls = max_calls;
        settings
    }

    fn engine(settings: ClassifierConfig, backend: Option<Arc<ScriptedBackend>>) -> ClassificationEngine {
        ClassificationEngine::new(
            settings,
            backend.map(|b| b as Arc<dyn ClassificationBackend>),
            Arc::new(RateLimiter::default()),
            FallbackClassifier::seeded(3),
        )
    }

    fn ticket() -> Ticket {
        Ticket {
            id: "ticket-1".into(),
            category_id: None,
            subject: "Checkout fails".into(),
            body: "500 on payment".into(),
            status: TicketStatus::Open,
            explanation: None,
            confidence: None,
            created_by: None,
            updated_by: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn vocab() -> Vec<String> {
        vec!["Billing".into(), "Bug Reports".into()]
    }

    #[tokio::test]
    async fn disabled_engine_falls_back_without_consuming_quota() {
        let backend = ScriptedBackend::new(vec![]);
        let engine = engine(settings(false, 1), Some(backend.clone()));

        for _ in 0..3 {
            let result = engine.classify(&ticket(), &vocab()).await.unwrap();
            assert_eq!(result.source, ClassificationSource::Fallback);
            assert!(vocab().contains(&result.category));
            assert!((10..=95).contains(&result.confidence));
            assert!(result.explanation.contains("(feature disabled)"));
        }
        assert!(!engine.is_enabled());
        assert!(backend.calls.lock().unwrap().is_empty());
        assert_eq!(engine.rate_limit_status().calls_made, 0);
    }

    #[tokio::test]
    async fn valid_backend_result_is_returned() {
        let backend = ScriptedBackend::new(vec![BackendOutcome::Success(json!({
            "category": "Bug Reports", "explanation": "Server error at checkout", "confidence": 91
        }))]);
        let engine = engine(settings(true, 5), Some(backend.clone()));

        let result = engine.classify(&ticket(), &vocab()).await.unwrap();
        assert_eq!(result.category, "Bug Reports");
        assert_eq!(result.confidence, 91);
        assert_eq!(result.source, ClassificationSource::Backend);

        let calls = backend.calls.lock().unwrap();
        assert!(calls[0].system_prompt.contains("Available categories: Billing, Bug Reports"));
        assert!(calls[0].user_content.contains("Ticket Subject: Checkout fails"));
        assert_eq!(calls[0].model, "gpt-3.5-turbo");
    }

    #[tokio::test]
    #[traced_test]
    async fn invalid_payload_falls_back_and_warns() {
        let backend = ScriptedBackend::new(vec![BackendOutcome::Success(json!({
            "category": "Billing", "explanation": "x", "confidence": 150
        }))]);
        let engine = engine(settings(true, 5), Some(backend));

        let result = engine.classify(&ticket(), &vocab()).await.unwrap();
        assert_eq!(result.source, ClassificationSource::Fallback);
        assert!(result.explanation.contains("(invalid response)"));
        assert!(logs_contain("invalid classification response"));
        assert!(logs_contain("150"));
    }

    #[tokio::test]
    #[traced_test]
    async fn transport_and_parse_errors_fall_back() {
        let backend = ScriptedBackend::new(vec![
            BackendOutcome::TransportError("connection refused".into()),
            BackendOutcome::ParseError("expected value at line 1".into()),
        ]);
        let engine = engine(settings(true, 5), Some(backend));

        for _ in 0..2 {
            let result = engine.classify(&ticket(), &vocab()).await.unwrap();
            assert!(result.explanation.contains("(upstream error)"));
        }
        assert!(logs_contain("backend classification failed"));
        assert!(logs_contain("connection refused"));
    }

    #[tokio::test]
    async fn exhausted_window_is_a_hard_error() {
        let backend = ScriptedBackend::new(vec![
            BackendOutcome::TransportError("a".into()),
            BackendOutcome::TransportError("b".into()),
        ]);
        let engine = engine(settings(true, 2), Some(backend.clone()));

        engine.classify(&ticket(), &vocab()).await.unwrap();
        engine.classify(&ticket(), &vocab()).await.unwrap();
        let err = engine.classify(&ticket(), &vocab()).await.unwrap_err();
        match err {
            TriageError::RateLimitExceeded { retry_after_secs } => {
                assert!(retry_after_secs > 0 && retry_after_secs <= 60);
            }
            other => panic!("expected rate limit error, got {other:?}"),
        }
        assert_eq!(backend.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_backend_times_out_into_fallback() {
        let mut s = settings(true, 5);
        s.timeout_secs = 2;
        let engine = engine(s, Some(ScriptedBackend::slow(Duration::from_secs(30))));

        let result = engine.classify(&ticket(), &vocab()).await.unwrap();
        assert!(result.explanation.contains("(upstream error)"));
    }

    #[tokio::test]
    async fn enabled_without_backend_is_disabled() {
        let engine = engine(settings(true, 5), None);
        assert!(!engine.is_enabled());
        let result = engine.classify(&ticket(), &[]).await.unwrap();
        assert!(result.explanation.contains("(feature disabled)"));
    }
}
