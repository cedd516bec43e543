// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Assembles storage, backend, and classification service from config.

use std::sync::Arc;

use tracing::info;
use triage_classifier::{ClassificationService, RateLimiter};
use triage_config::TriageConfig;
use triage_core::{ClassificationBackend, TicketStore, TriageError};
use triage_openai::OpenAiBackend;
use triage_storage::SqliteStorage;

/// Initializes the tracing subscriber with the given log level.
///
/// Logs go to stderr so command output on stdout stays machine-readable.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("triage={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

pub async fn open_storage(config: &TriageConfig) -> Result<Arc<SqliteStorage>, TriageError> {
    let storage = SqliteStorage::open(config.storage.clone()).await?;
    Ok(Arc::new(storage))
}

/// The OpenAI backend when classification is enabled.
///
/// An enabled classifier without an API key is a startup error.
pub fn build_backend(
    config: &TriageConfig,
) -> Result<Option<Arc<dyn ClassificationBackend>>, TriageError> {
    if !config.classifier.enabled {
        info!("classification backend disabled; fallback classifier only");
        return Ok(None);
    }
    let backend = OpenAiBackend::new(&config.classifier)?;
    Ok(Some(Arc::new(backend)))
}

pub fn build_service(
    config: &TriageConfig,
    store: Arc<dyn TicketStore>,
) -> Result<ClassificationService, TriageError> {
    let backend = build_backend(config)?;
    Ok(ClassificationService::from_config(
        config.classifier.clone(),
        store,
        backend,
        Arc::new(RateLimiter::default()),
    ))
}
