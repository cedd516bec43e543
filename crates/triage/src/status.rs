// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `triage status` command implementation.
//!
//! Queries a running server's health and classification status endpoints.
//! Falls back gracefully when the server is not running.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use triage_config::TriageConfig;
use triage_core::TriageError;
use triage_core::types::RateLimitStatus;

/// Health endpoint response.
#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
    uptime_secs: u64,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct ClassificationStatusBody {
    rate_limit_status: RateLimitStatus,
    classification_enabled: bool,
}

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub running: bool,
    pub status: String,
    pub uptime_secs: Option<u64>,
    pub uptime_human: Option<String>,
    pub classification_enabled: Option<bool>,
    pub rate_limit_status: Option<RateLimitStatus>,
    pub endpoint: String,
}

/// Format seconds into a human-readable duration string.
fn format_uptime(secs: u64) -> String {
    let days = secs / 86400;
    let hours = (secs % 86400) / 3600;
    let minutes = (secs % 3600) / 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Collect status from the server at `base_url`.
pub async fn fetch_status(base_url: &str) -> Result<StatusResponse, TriageError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(3))
        .build()
        .map_err(|e| TriageError::Internal(format!("failed to create HTTP client: {e}")))?;

    let offline = || StatusResponse {
        running: false,
        status: "not running".to_string(),
        uptime_secs: None,
        uptime_human: None,
        classification_enabled: None,
        rate_limit_status: None,
        endpoint: base_url.to_string(),
    };

    let health = match client.get(format!("{base_url}/health")).send().await {
        Ok(resp) if resp.status().is_success() => resp
            .json::<HealthResponse>()
            .await
            .map_err(|e| TriageError::Internal(format!("failed to parse health response: {e}")))?,
        _ => return Ok(offline()),
    };

    let classification = match client
        .get(format!("{base_url}/api/tickets/classify/status"))
        .send()
        .await
    {
        Ok(resp) if resp.status().is_success() => {
            resp.json::<Envelope<ClassificationStatusBody>>().await.ok()
        }
        _ => None,
    }
    .map(|envelope| envelope.data);

    Ok(StatusResponse {
        running: true,
        status: health.status,
        uptime_secs: Some(health.uptime_secs),
        uptime_human: Some(format_uptime(health.uptime_secs)),
        classification_enabled: classification.as_ref().map(|c| c.classification_enabled),
        rate_limit_status: classification.map(|c| c.rate_limit_status),
        endpoint: base_url.to_string(),
    })
}

/// Run the `triage status` command.
pub async fn run_status(config: &TriageConfig, json: bool) -> Result<(), TriageError> {
    let base_url = format!("http://{}:{}", config.server.host, config.server.port);
    let status = fetch_status(&base_url).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&status).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        print_status(&status);
    }
    Ok(())
}

fn print_status(status: &StatusResponse) {
    println!();
    println!("  triage status");
    println!("  {}", "-".repeat(35));

    if !status.running {
        println!("    State:    [FAIL] not running");
        println!("    Endpoint: {}/health", status.endpoint);
        println!();
        println!("  Start with: triage serve");
        println!();
        return;
    }

    println!(
        "    State:    [OK] {} (uptime: {})",
        status.status,
        status.uptime_human.as_deref().unwrap_or("?")
    );
    match status.classification_enabled {
        Some(true) => println!("    Classify: backend enabled"),
        Some(false) => println!("    Classify: fallback only"),
        None => println!("    Classify: unknown"),
    }
    if let Some(rl) = &status.rate_limit_status {
        println!(
            "    Quota:    {}/{} calls used, resets in {}s",
            rl.calls_made, rl.max_calls, rl.available_in_seconds
        );
    }
    println!();
}
