// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `triage classify` command implementation.
//!
//! Runs one classification in-process against the configured database. The
//! rate-limit window lives in this process only, so it starts empty.

use triage_config::TriageConfig;
use triage_core::TriageError;

use crate::wiring;

pub async fn run_classify(config: &TriageConfig, ticket_id: &str) -> Result<(), TriageError> {
    wiring::init_tracing(&config.app.log_level);
    let storage = wiring::open_storage(config).await?;
    let service = wiring::build_service(config, storage.clone())?;

    let outcome = service.classify(ticket_id).await?;
    let rendered = serde_json::to_string_pretty(&outcome)
        .map_err(|e| TriageError::Internal(format!("failed to render outcome: {e}")))?;
    println!("{rendered}");

    storage.close().await
}
