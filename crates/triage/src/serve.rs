// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `triage serve` command implementation.
//!
//! Opens storage, wires the classification service, and runs the HTTP API
//! until SIGINT or SIGTERM.

use std::sync::Arc;

use tracing::{info, warn};
use triage_config::TriageConfig;
use triage_core::{PluginAdapter, TicketStore, TriageError};
use triage_gateway::{GatewayState, ServerConfig};

use crate::wiring;

pub async fn run_serve(config: TriageConfig) -> Result<(), TriageError> {
    wiring::init_tracing(&config.app.log_level);
    info!(name = %config.app.name, "starting triage serve");

    let storage = wiring::open_storage(&config).await?;
    storage.health_check().await?;
    if storage.category_names().await?.is_empty() {
        warn!("no categories defined; run `triage seed` to add the defaults");
    }

    let store: Arc<dyn TicketStore> = storage.clone();
    let service = Arc::new(wiring::build_service(&config, store.clone())?);
    info!(
        classification_enabled = service.status().classification_enabled,
        model = %config.classifier.model,
        max_calls = config.classifier.rate_limit.max_calls,
        window_seconds = config.classifier.rate_limit.window_seconds,
        "classification service ready"
    );

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    triage_gateway::start_server(
        &server_config,
        GatewayState::new(store, service),
        shutdown_signal(),
    )
    .await?;

    storage.close().await?;
    info!("triage serve shutdown complete");
    Ok(())
}

/// Resolves on SIGINT (Ctrl+C) or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT (Ctrl+C), initiating shutdown"),
        _ = terminate => info!("received SIGTERM, initiating shutdown"),
    }
}
