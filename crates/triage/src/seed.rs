// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `triage seed` command implementation.

use triage_config::TriageConfig;
use triage_core::{TicketStore, TriageError};

use crate::wiring;

/// Insert the default categories and report what the table now holds.
pub async fn run_seed(config: &TriageConfig) -> Result<(), TriageError> {
    wiring::init_tracing(&config.app.log_level);
    let storage = wiring::open_storage(config).await?;

    let inserted = storage.seed_default_categories().await?;
    let names = storage.category_names().await?;
    println!("seeded {inserted} categories ({} total): {}", names.len(), names.join(", "));

    storage.close().await
}
