// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The classify-ticket use case as exposed to the HTTP layer and CLI.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, instrument};
use triage_config::model::ClassifierConfig;
use triage_core::types::{ClassificationResult, RateLimitStatus, TicketWithCategory};
use triage_core::{ClassificationBackend, TicketStore, TriageError};

use crate::applier::TicketUpdateApplier;
use crate::engine::ClassificationEngine;
use crate::fallback::FallbackClassifier;
use crate::rate_limit::RateLimiter;

/// Result of classifying one ticket.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationOutcome {
    pub ticket: TicketWithCategory,
    pub classification: ClassificationResult,
    /// Limiter state sampled before the backend call.
    pub rate_limit_status: RateLimitStatus,
    pub classification_enabled: bool,
}

/// Classification feature status.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationStatus {
    pub rate_limit_status: RateLimitStatus,
    pub classification_enabled: bool,
}

/// Loads a ticket, classifies it, and applies the result.
pub struct ClassificationService {
    store: Arc<dyn TicketStore>,
    engine: ClassificationEngine,
    applier: TicketUpdateApplier,
}

impl ClassificationService {
    pub fn new(store: Arc<dyn TicketStore>, engine: ClassificationEngine) -> Self {
        let applier = TicketUpdateApplier::new(Arc::clone(&store));
        Self {
            store,
            engine,
            applier,
        }
    }

    /// Wire a service from configuration with an entropy-seeded fallback.
    pub fn from_config(
        settings: ClassifierConfig,
        store: Arc<dyn TicketStore>,
        backend: Option<Arc<dyn ClassificationBackend>>,
        limiter: Arc<RateLimiter>,
    ) -> Self {
        let engine = ClassificationEngine::new(settings, backend, limiter, FallbackClassifier::new());
        Self::new(store, engine)
    }

    /// Classify the ticket with the given id.
    ///
    /// Fails with `NotFound` for an unknown ticket and `RateLimitExceeded`
    /// when the window is exhausted; in both cases nothing is written.
    #[instrument(skip(self))]
    pub async fn classify(&self, ticket_id: &str) -> Result<ClassificationOutcome, TriageError> {
        let ticket = self
            .store
            .get_ticket(ticket_id)
            .await?
            .ok_or_else(|| TriageError::ticket_not_found(ticket_id))?;

        let rate_limit_status = self.engine.rate_limit_status();
        let known_categories = self.store.category_names().await?;
        debug!(categories = known_categories.len(), "loaded category vocabulary");

        let classification = self.engine.classify(&ticket, &known_categories).await?;
        let ticket = self.applier.apply(&ticket, &classification).await?;

        Ok(ClassificationOutcome {
            ticket,
            classification,
            rate_limit_status,
            classification_enabled: self.engine.is_enabled(),
        })
    }

    pub fn status(&self) -> ClassificationStatus {
        ClassificationStatus {
            rate_limit_status: self.engine.rate_limit_status(),
            classification_enabled: self.engine.is_enabled(),
        }
    }
}
