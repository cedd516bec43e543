// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end classification testing.
//!
//! `TestHarness` assembles a temp SQLite store seeded with the default
//! categories, a [`MockBackend`], a [`ManualClock`]-driven rate limiter, and
//! a seeded fallback classifier behind a [`ClassificationService`].

use std::sync::Arc;

use serde_json::Value;
use triage_classifier::{ClassificationEngine, ClassificationService, FallbackClassifier, RateLimiter};
use triage_config::model::{ClassifierConfig, StorageConfig};
use triage_core::types::{Ticket, TicketDraft};
use triage_core::{BackendOutcome, ClassificationBackend, TicketStatus, TicketStore, TriageError};
use triage_storage::SqliteStorage;

use crate::clock::ManualClock;
use crate::mock_backend::MockBackend;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    outcomes: Vec<BackendOutcome>,
    enabled: bool,
    max_calls: u32,
    window_seconds: u64,
    seed: u64,
    seed_categories: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            outcomes: Vec::new(),
            enabled: false,
            max_calls: 10,
            window_seconds: 60,
            seed: 7,
            seed_categories: true,
        }
    }

    /// Enable backend classification.
    pub fn enabled(mut self) -> Self {
        self.enabled = true;
        self
    }

    /// Queue backend outcomes; implies [`enabled`](Self::enabled).
    pub fn with_backend_outcomes(mut self, outcomes: Vec<BackendOutcome>) -> Self {
        self.outcomes = outcomes;
        self.enabled = true;
        self
    }

    /// Queue successful backend payloads; implies [`enabled`](Self::enabled).
    pub fn with_backend_json(self, payloads: Vec<Value>) -> Self {
        self.with_backend_outcomes(payloads.into_iter().map(BackendOutcome::Success).collect())
    }

    pub fn with_rate_limit(mut self, max_calls: u32, window_seconds: u64) -> Self {
        self.max_calls = max_calls;
        self.window_seconds = window_seconds;
        self
    }

    /// Seed for the fallback classifier's random source.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Start with an empty category table.
    pub fn without_categories(mut self) -> Self {
        self.seed_categories = false;
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, TriageError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| TriageError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db");

        let storage = SqliteStorage::open(StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: true,
        })
        .await?;
        if self.seed_categories {
            storage.seed_default_categories().await?;
        }
        let storage = Arc::new(storage);
        let store: Arc<dyn TicketStore> = storage.clone();

        let mut config = ClassifierConfig {
            enabled: self.enabled,
            ..ClassifierConfig::default()
        };
        config.rate_limit.max_calls = self.max_calls;
        config.rate_limit.window_seconds = self.window_seconds;

        let backend = Arc::new(MockBackend::with_outcomes(self.outcomes));
        let clock = Arc::new(ManualClock::new());
        let limiter = Arc::new(RateLimiter::new(clock.clone()));
        let engine = ClassificationEngine::new(
            config.clone(),
            Some(backend.clone() as Arc<dyn ClassificationBackend>),
            limiter,
            FallbackClassifier::seeded(self.seed),
        );
        let service = Arc::new(ClassificationService::new(store.clone(), engine));

        Ok(TestHarness {
            storage,
            store,
            backend,
            clock,
            service,
            config,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete classification stack over a throwaway database.
pub struct TestHarness {
    pub storage: Arc<SqliteStorage>,
    pub store: Arc<dyn TicketStore>,
    pub backend: Arc<MockBackend>,
    pub clock: Arc<ManualClock>,
    pub service: Arc<ClassificationService>,
    pub config: ClassifierConfig,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Create an open ticket with no category.
    pub async fn create_ticket(&self, subject: &str, body: &str) -> Result<Ticket, TriageError> {
        self.store
            .create_ticket(TicketDraft {
                category_id: None,
                subject: subject.to_string(),
                body: body.to_string(),
                status: TicketStatus::Open,
                explanation: None,
                confidence: None,
                created_by: None,
                updated_by: None,
            })
            .await
    }

    /// Id of the category with the given name.
    pub async fn category_id(&self, name: &str) -> Result<String, TriageError> {
        self.store
            .find_category_by_name(name)
            .await?
            .map(|c| c.id)
            .ok_or_else(|| TriageError::category_not_found(name))
    }
}
