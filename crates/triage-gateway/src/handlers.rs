// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the ticket API.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::info;
use triage_core::types::{NewTicket, TicketPatch};
use triage_classifier::ClassificationStatus;
use triage_core::{HealthStatus, PluginAdapter, TicketStore, TriageError};

use crate::query::ListTicketsQuery;
use crate::response::{ApiError, ApiResponse};
use crate::server::GatewayState;
use crate::validation;

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

async fn category_exists(store: &dyn TicketStore, id: Option<&str>) -> Result<bool, TriageError> {
    match id {
        Some(id) => Ok(store.get_category(id).await?.is_some()),
        None => Ok(true),
    }
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    let status = match state.store.health_check().await {
        Ok(HealthStatus::Healthy) => "ok",
        Ok(_) => "degraded",
        Err(_) => "unavailable",
    };
    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
    })
}

/// GET /api/categories
pub async fn list_categories(State(state): State<GatewayState>) -> Result<Response, ApiError> {
    let categories = state.store.list_categories().await?;
    Ok(Json(ApiResponse::ok(categories)).into_response())
}

/// GET /api/tickets
pub async fn list_tickets(
    State(state): State<GatewayState>,
    Query(query): Query<ListTicketsQuery>,
) -> Result<Response, ApiError> {
    let filter = query.into_filter()?;
    let page = state.store.list_tickets(&filter).await?;
    Ok(Json(ApiResponse::page(page)).into_response())
}

/// POST /api/tickets
pub async fn create_ticket(
    State(state): State<GatewayState>,
    Json(input): Json<NewTicket>,
) -> Result<Response, ApiError> {
    let known = category_exists(state.store.as_ref(), validation::referenced_category(&input)).await?;
    let draft = validation::new_ticket(input, known)?;

    let ticket = state.store.create_ticket(draft).await?;
    info!(ticket_id = %ticket.id, "ticket created");
    let ticket = state
        .store
        .get_ticket_with_category(&ticket.id)
        .await?
        .ok_or_else(|| TriageError::ticket_not_found(&ticket.id))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(ticket).with_message("Ticket created successfully")),
    )
        .into_response())
}

/// GET /api/tickets/{id}
pub async fn show_ticket(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let ticket = state
        .store
        .get_ticket_with_category(&id)
        .await?
        .ok_or_else(|| TriageError::ticket_not_found(&id))?;
    Ok(Json(ApiResponse::ok(ticket)).into_response())
}

/// PATCH /api/tickets/{id}
pub async fn update_ticket(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    Json(input): Json<TicketPatch>,
) -> Result<Response, ApiError> {
    let known = category_exists(state.store.as_ref(), validation::patched_category(&input)).await?;
    let changes = validation::ticket_patch(input, known)?;

    state
        .store
        .update_ticket(&id, changes)
        .await?
        .ok_or_else(|| TriageError::ticket_not_found(&id))?;
    let ticket = state
        .store
        .get_ticket_with_category(&id)
        .await?
        .ok_or_else(|| TriageError::ticket_not_found(&id))?;

    Ok(Json(ApiResponse::ok(ticket).with_message("Ticket updated successfully")).into_response())
}

/// POST /api/tickets/{id}/classify
pub async fn classify_ticket(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let outcome = state.classifier.classify(&id).await?;
    Ok(Json(ApiResponse::ok(outcome).with_message("Ticket classified successfully")).into_response())
}

/// GET /api/tickets/classify/status
pub async fn classification_status(
    State(state): State<GatewayState>,
) -> Json<ApiResponse<ClassificationStatus>> {
    Json(ApiResponse::ok(state.classifier.status()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_response_serializes() {
        let resp = HealthResponse {
            status: "ok".to_string(),
            version: "0.1.0".to_string(),
            uptime_secs: 42,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
        assert!(json.contains("\"version\":\"0.1.0\""));
        assert!(json.contains("\"uptime_secs\":42"));
    }
}
