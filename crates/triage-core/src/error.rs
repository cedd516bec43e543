// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Triage ticket tracker.

use thiserror::Error;

use crate::types::FieldError;

/// The primary error type used across all Triage crates.
#[derive(Debug, Error)]
pub enum TriageError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, migration).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Classification backend errors (HTTP failure, malformed body).
    ///
    /// The classification engine absorbs these into a fallback result; they
    /// only surface from direct backend calls.
    #[error("backend error: {message}")]
    Backend {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A ticket or category does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The classification rate limit window is exhausted.
    #[error("Rate limit exceeded. Please try again in {retry_after_secs} seconds.")]
    RateLimitExceeded { retry_after_secs: u64 },

    /// Request payload failed field validation.
    #[error("validation failed: {}", format_field_errors(errors))]
    Validation { errors: Vec<FieldError> },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TriageError {
    /// Shorthand for a missing ticket.
    pub fn ticket_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "ticket",
            id: id.into(),
        }
    }

    /// Shorthand for a missing category.
    pub fn category_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "category",
            id: id.into(),
        }
    }
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_message_mentions_retry_after() {
        let err = TriageError::RateLimitExceeded {
            retry_after_secs: 42,
        };
        assert_eq!(
            err.to_string(),
            "Rate limit exceeded. Please try again in 42 seconds."
        );
    }

    #[test]
    fn not_found_names_entity_and_id() {
        assert_eq!(
            TriageError::ticket_not_found("t-1").to_string(),
            "ticket not found: t-1"
        );
        assert_eq!(
            TriageError::category_not_found("c-9").to_string(),
            "category not found: c-9"
        );
    }

    #[test]
    fn validation_lists_every_field() {
        let err = TriageError::Validation {
            errors: vec![
                FieldError::new("subject", "is required"),
                FieldError::new("status", "must be one of open, in_progress, resolved, closed"),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("subject: is required"));
        assert!(msg.contains("status: must be one of"));
    }
}
