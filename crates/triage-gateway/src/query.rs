// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query-string parsing for ticket listings.

use std::str::FromStr;

use serde::Deserialize;
use triage_core::TriageError;
use triage_core::types::{
    DEFAULT_PER_PAGE, FieldError, SortField, SortOrder, TicketFilter, TicketStatus,
};

/// Raw `GET /api/tickets` query parameters.
///
/// Everything arrives as text so that malformed values become 422 field
/// errors instead of axum's plain-text rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ListTicketsQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub category_id: Option<String>,
    pub min_confidence: Option<String>,
    pub max_confidence: Option<String>,
    pub created_by: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn parse_field<T: FromStr>(
    field: &str,
    value: Option<String>,
    message: &str,
    errors: &mut Vec<FieldError>,
) -> Option<T> {
    let value = present(value)?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            errors.push(FieldError::new(field, message));
            None
        }
    }
}

impl ListTicketsQuery {
    /// Convert into a [`TicketFilter`]. Page size is clamped later by the filter.
    pub fn into_filter(self) -> Result<TicketFilter, TriageError> {
        let mut errors = Vec::new();

        let status = parse_field::<TicketStatus>(
            "status",
            self.status,
            "The selected status is invalid.",
            &mut errors,
        );
        let min_confidence = parse_field::<u8>(
            "min_confidence",
            self.min_confidence,
            "The min confidence must be an integer between 0 and 255.",
            &mut errors,
        );
        let max_confidence = parse_field::<u8>(
            "max_confidence",
            self.max_confidence,
            "The max confidence must be an integer between 0 and 255.",
            &mut errors,
        );
        let sort_by = parse_field::<SortField>(
            "sort_by",
            self.sort_by,
            "The selected sort by is invalid.",
            &mut errors,
        );
        let sort_order = parse_field::<SortOrder>(
            "sort_order",
            self.sort_order,
            "The sort order must be asc or desc.",
            &mut errors,
        );
        let page = parse_field::<u32>(
            "page",
            self.page,
            "The page must be a positive integer.",
            &mut errors,
        );
        let per_page = parse_field::<u32>(
            "per_page",
            self.per_page,
            "The per page must be a positive integer.",
            &mut errors,
        );

        if !errors.is_empty() {
            return Err(TriageError::Validation { errors });
        }

        Ok(TicketFilter {
            search: present(self.search),
            status,
            category_id: present(self.category_id),
            min_confidence,
            max_confidence,
            created_by: present(self.created_by),
            sort_by: sort_by.unwrap_or_default(),
            sort_order: sort_order.unwrap_or_default(),
            page: page.unwrap_or(1),
            per_page: per_page.unwrap_or(DEFAULT_PER_PAGE),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_yields_default_filter() {
        let filter = ListTicketsQuery::default().into_filter().unwrap();
        assert_eq!(filter, TicketFilter::default());
    }

    #[test]
    fn all_parameters_are_parsed() {
        let query = ListTicketsQuery {
            search: Some("login".into()),
            status: Some("in_progress".into()),
            category_id: Some("cat-1".into()),
            min_confidence: Some("40".into()),
            max_confidence: Some("90".into()),
            created_by: Some("agent-7".into()),
            sort_by: Some("confidence".into()),
            sort_order: Some("ASC".into()),
            page: Some("3".into()),
            per_page: Some("500".into()),
        };
        let filter = query.into_filter().unwrap();
        assert_eq!(filter.status, Some(TicketStatus::InProgress));
        assert_eq!(filter.min_confidence, Some(40));
        assert_eq!(filter.sort_by, SortField::Confidence);
        assert_eq!(filter.sort_order, SortOrder::Asc);
        assert_eq!(filter.page, 3);
        assert_eq!(filter.effective_per_page(), 100);
    }

    #[test]
    fn empty_values_are_ignored() {
        let query = ListTicketsQuery {
            search: Some(String::new()),
            status: Some(String::new()),
            ..ListTicketsQuery::default()
        };
        let filter = query.into_filter().unwrap();
        assert!(filter.search.is_none());
        assert!(filter.status.is_none());
    }

    #[test]
    fn malformed_values_are_field_errors() {
        let query = ListTicketsQuery {
            status: Some("pending".into()),
            sort_by: Some("id; DROP TABLE tickets".into()),
            per_page: Some("-1".into()),
            ..ListTicketsQuery::default()
        };
        match query.into_filter().unwrap_err() {
            TriageError::Validation { errors } => {
                let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["status", "sort_by", "per_page"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
