// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Field validation for ticket create and update payloads.
//!
//! Every rule is checked and all failures are reported together. Category
//! existence needs the store, so callers resolve it first and pass the
//! answer in.

use std::str::FromStr;

use triage_core::TriageError;
use triage_core::types::{FieldError, NewTicket, TicketChanges, TicketDraft, TicketPatch, TicketStatus};

/// Maximum length, in characters, of `subject` and `explanation`.
pub const MAX_SHORT_TEXT: usize = 255;

/// Blank strings count as absent.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn required_text(
    field: &str,
    value: Option<String>,
    max_len: Option<usize>,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    let Some(value) = non_blank(value) else {
        errors.push(FieldError::new(field, format!("The {field} field is required.")));
        return None;
    };
    if let Some(max) = max_len
        && value.chars().count() > max
    {
        errors.push(FieldError::new(
            field,
            format!("The {field} field must not be greater than {max} characters."),
        ));
        return None;
    }
    Some(value)
}

fn optional_text(
    field: &str,
    value: Option<String>,
    max_len: usize,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    let value = non_blank(value)?;
    if value.chars().count() > max_len {
        errors.push(FieldError::new(
            field,
            format!("The {field} field must not be greater than {max_len} characters."),
        ));
        return None;
    }
    Some(value)
}

fn status(value: Option<String>, errors: &mut Vec<FieldError>) -> Option<TicketStatus> {
    let Some(value) = non_blank(value) else {
        errors.push(FieldError::new("status", "The status field is required."));
        return None;
    };
    match TicketStatus::from_str(&value) {
        Ok(status) => Some(status),
        Err(_) => {
            errors.push(FieldError::new("status", "The selected status is invalid."));
            None
        }
    }
}

fn confidence(value: Option<i64>, errors: &mut Vec<FieldError>) -> Option<u8> {
    let value = value?;
    match u8::try_from(value) {
        Ok(c) if (1..=100).contains(&c) => Some(c),
        _ => {
            errors.push(FieldError::new(
                "confidence",
                "The confidence field must be between 1 and 100.",
            ));
            None
        }
    }
}

fn category(value: Option<String>, exists: bool, errors: &mut Vec<FieldError>) -> Option<String> {
    let value = non_blank(value)?;
    if !exists {
        errors.push(FieldError::new("category_id", "The selected category id is invalid."));
        return None;
    }
    Some(value)
}

/// The category id a create payload refers to, if any.
pub fn referenced_category(input: &NewTicket) -> Option<&str> {
    input.category_id.as_deref().filter(|s| !s.trim().is_empty())
}

/// The category id a patch payload assigns, if any.
pub fn patched_category(input: &TicketPatch) -> Option<&str> {
    input
        .category_id
        .as_ref()
        .and_then(|c| c.as_deref())
        .filter(|s| !s.trim().is_empty())
}

/// Validate a create payload.
pub fn new_ticket(input: NewTicket, category_exists: bool) -> Result<TicketDraft, TriageError> {
    let mut errors = Vec::new();

    let category_id = category(input.category_id, category_exists, &mut errors);
    let subject = required_text("subject", input.subject, Some(MAX_SHORT_TEXT), &mut errors);
    let body = required_text("body", input.body, None, &mut errors);
    let status = status(input.status, &mut errors);
    let explanation = optional_text("explanation", input.explanation, MAX_SHORT_TEXT, &mut errors);
    let confidence = confidence(input.confidence, &mut errors);

    match (subject, body, status) {
        (Some(subject), Some(body), Some(status)) if errors.is_empty() => Ok(TicketDraft {
            category_id,
            subject,
            body,
            status,
            explanation,
            confidence,
            created_by: non_blank(input.created_by),
            updated_by: non_blank(input.updated_by),
        }),
        _ => Err(TriageError::Validation { errors }),
    }
}

/// Validate a partial update. Absent keys stay untouched; `null` clears
/// nullable columns and is rejected for required ones.
pub fn ticket_patch(input: TicketPatch, category_exists: bool) -> Result<TicketChanges, TriageError> {
    let mut errors = Vec::new();
    let mut changes = TicketChanges::default();

    if let Some(value) = input.category_id {
        changes.category_id = Some(category(value, category_exists, &mut errors));
    }
    if let Some(value) = input.subject {
        changes.subject = required_text("subject", value, Some(MAX_SHORT_TEXT), &mut errors);
    }
    if let Some(value) = input.body {
        changes.body = required_text("body", value, None, &mut errors);
    }
    if let Some(value) = input.status {
        changes.status = status(value, &mut errors);
    }
    if let Some(value) = input.explanation {
        changes.explanation = Some(optional_text("explanation", value, MAX_SHORT_TEXT, &mut errors));
    }
    if let Some(value) = input.confidence {
        changes.confidence = Some(confidence(value, &mut errors));
    }
    if let Some(value) = input.created_by {
        changes.created_by = Some(non_blank(value));
    }
    if let Some(value) = input.updated_by {
        changes.updated_by = Some(non_blank(value));
    }

    if errors.is_empty() {
        Ok(changes)
    } else {
        Err(TriageError::Validation { errors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> NewTicket {
        NewTicket {
            subject: Some("Cannot log in".into()),
            body: Some("Password reset email never arrives".into()),
            status: Some("open".into()),
            ..NewTicket::default()
        }
    }

    fn fields(err: TriageError) -> Vec<String> {
        match err {
            TriageError::Validation { errors } => errors.into_iter().map(|e| e.field).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn minimal_create_payload_is_valid() {
        let draft = new_ticket(valid_input(), true).unwrap();
        assert_eq!(draft.subject, "Cannot log in");
        assert_eq!(draft.status, TicketStatus::Open);
        assert!(draft.category_id.is_none());
        assert!(draft.confidence.is_none());
    }

    #[test]
    fn empty_create_payload_reports_all_required_fields() {
        let err = new_ticket(NewTicket::default(), true).unwrap_err();
        assert_eq!(fields(err), vec!["subject", "body", "status"]);
    }

    #[test]
    fn create_rules_are_checked_together() {
        let input = NewTicket {
            category_id: Some("missing".into()),
            subject: Some("x".repeat(256)),
            status: Some("pending".into()),
            explanation: Some("y".repeat(256)),
            confidence: Some(101),
            ..valid_input()
        };
        let err = new_ticket(input, false).unwrap_err();
        assert_eq!(
            fields(err),
            vec!["category_id", "subject", "status", "explanation", "confidence"]
        );
    }

    #[test]
    fn subject_limit_counts_characters() {
        let input = NewTicket {
            subject: Some("é".repeat(255)),
            ..valid_input()
        };
        assert!(new_ticket(input, true).is_ok());
    }

    #[test]
    fn confidence_bounds_are_inclusive() {
        for ok in [1, 100] {
            let input = NewTicket {
                confidence: Some(ok),
                ..valid_input()
            };
            assert_eq!(new_ticket(input, true).unwrap().confidence, Some(ok as u8));
        }
        for bad in [0, -5, 300] {
            let input = NewTicket {
                confidence: Some(bad),
                ..valid_input()
            };
            assert_eq!(fields(new_ticket(input, true).unwrap_err()), vec!["confidence"]);
        }
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let changes = ticket_patch(TicketPatch::default(), true).unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn patch_null_clears_nullable_columns() {
        let patch: TicketPatch =
            serde_json::from_str(r#"{"category_id": null, "explanation": null, "confidence": null}"#)
                .unwrap();
        assert_eq!(patched_category(&patch), None);
        let changes = ticket_patch(patch, true).unwrap();
        assert_eq!(changes.category_id, Some(None));
        assert_eq!(changes.explanation, Some(None));
        assert_eq!(changes.confidence, Some(None));
        assert!(changes.subject.is_none());
    }

    #[test]
    fn patch_null_on_required_field_is_rejected() {
        let patch: TicketPatch =
            serde_json::from_str(r#"{"subject": null, "status": "done"}"#).unwrap();
        assert_eq!(fields(ticket_patch(patch, true).unwrap_err()), vec!["subject", "status"]);
    }

    #[test]
    fn patch_sets_category_when_it_exists() {
        let patch: TicketPatch = serde_json::from_str(r#"{"category_id": "cat-1"}"#).unwrap();
        assert_eq!(patched_category(&patch), Some("cat-1"));
        let changes = ticket_patch(patch.clone(), true).unwrap();
        assert_eq!(changes.category_id, Some(Some("cat-1".into())));
        assert_eq!(fields(ticket_patch(patch, false).unwrap_err()), vec!["category_id"]);
    }
}
