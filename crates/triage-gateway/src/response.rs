// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response envelope and error-to-status mapping.

use std::collections::BTreeMap;

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;
use triage_core::TriageError;
use triage_core::types::{FieldError, Page, Pagination};

/// Envelope wrapping every API body.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    /// Field name to messages, on validation failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
    /// Seconds until a rate-limited call may be retried.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            pagination: None,
            errors: None,
            retry_after: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    /// A listing page: items under `data`, metadata under `pagination`.
    pub fn page(page: Page<T>) -> Self {
        Self {
            pagination: Some(page.pagination),
            ..Self::ok(page.items)
        }
    }
}

impl ApiResponse<()> {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
            pagination: None,
            errors: None,
            retry_after: None,
        }
    }
}

/// Group field errors by field, preserving message order.
pub fn group_field_errors(errors: &[FieldError]) -> BTreeMap<String, Vec<String>> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for e in errors {
        grouped.entry(e.field.clone()).or_default().push(e.message.clone());
    }
    grouped
}

/// Handler error carrying a [`TriageError`] to its HTTP representation.
#[derive(Debug)]
pub struct ApiError(pub TriageError);

impl From<TriageError> for ApiError {
    fn from(err: TriageError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            TriageError::NotFound { entity, .. } => {
                let message = match entity {
                    "ticket" => "Ticket not found".to_string(),
                    "category" => "Category not found".to_string(),
                    other => format!("{other} not found"),
                };
                (StatusCode::NOT_FOUND, Json(ApiResponse::failure(message))).into_response()
            }
            TriageError::RateLimitExceeded { retry_after_secs } => {
                let body = ApiResponse {
                    retry_after: Some(retry_after_secs),
                    ..ApiResponse::failure(format!(
                        "Rate limit exceeded. Try again in {retry_after_secs} seconds."
                    ))
                };
                let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
                response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
                response
            }
            TriageError::Validation { errors } => {
                let body = ApiResponse {
                    errors: Some(group_field_errors(&errors)),
                    ..ApiResponse::failure("The given data was invalid.")
                };
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
            other => {
                error!(error = %other, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::failure("Internal server error")),
                )
                    .into_response()
            }
        }
    }
}
