// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Triage workspace.

use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Lifecycle status of a support ticket.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [TicketStatus; 4] = [
        TicketStatus::Open,
        TicketStatus::InProgress,
        TicketStatus::Resolved,
        TicketStatus::Closed,
    ];
}

/// Category vocabulary used when the store has none, and seeded by `triage seed`.
pub const DEFAULT_CATEGORIES: [&str; 3] = ["General Inquiry", "Technical Support", "Bug Reports"];

/// A support request record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub category_id: Option<String>,
    pub subject: String,
    pub body: String,
    pub status: TicketStatus,
    /// Explanation from the most recent classification. `None` means the
    /// ticket has never been classified.
    pub explanation: Option<String>,
    /// Confidence from the most recent classification, 1-100.
    pub confidence: Option<u8>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A named classification bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A category together with the number of tickets assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryWithCount {
    #[serde(flatten)]
    pub category: Category,
    pub tickets_count: u64,
}

/// A ticket with its category relation resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketWithCategory {
    #[serde(flatten)]
    pub ticket: Ticket,
    pub category: Option<Category>,
}

/// Payload for creating a ticket.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTicket {
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub confidence: Option<i64>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub updated_by: Option<String>,
}

/// Validated ticket fields ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketDraft {
    pub category_id: Option<String>,
    pub subject: String,
    pub body: String,
    pub status: TicketStatus,
    pub explanation: Option<String>,
    pub confidence: Option<u8>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
}

/// Partial ticket update.
///
/// Nullable columns are tri-state: an absent key leaves the column alone,
/// an explicit `null` clears it, and a value sets it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketPatch {
    #[serde(default, deserialize_with = "double_option")]
    pub category_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub subject: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub body: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub status: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub explanation: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub confidence: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub created_by: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub updated_by: Option<Option<String>>,
}

/// Validated partial update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketChanges {
    pub category_id: Option<Option<String>>,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub status: Option<TicketStatus>,
    pub explanation: Option<Option<String>>,
    pub confidence: Option<Option<u8>>,
    pub created_by: Option<Option<String>>,
    pub updated_by: Option<Option<String>>,
}

impl TicketChanges {
    /// True when the update would not touch any column.
    pub fn is_empty(&self) -> bool {
        self == &TicketChanges::default()
    }
}

fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Where a classification came from. Used for logging only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ClassificationSource {
    #[default]
    Backend,
    Fallback,
}

/// A normalized classification: category name, explanation, and confidence.
///
/// The source flag is never serialized; fallback and backend results are
/// indistinguishable in shape to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub category: String,
    pub explanation: String,
    pub confidence: u8,
    #[serde(skip)]
    pub source: ClassificationSource,
}

/// The fields written back to a ticket after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationUpdate {
    pub explanation: String,
    pub confidence: u8,
    /// `Some` when the category should be (re)assigned.
    pub category_id: Option<String>,
}

/// Snapshot of a rate limit window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitStatus {
    pub calls_made: u32,
    pub max_calls: u32,
    pub remaining_calls: u32,
    pub window_seconds: u64,
    /// Seconds until the current window resets, 0 when no window is active.
    pub available_in_seconds: u64,
}

/// Columns tickets may be sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Subject,
    Status,
    Confidence,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Default page size for ticket listings.
pub const DEFAULT_PER_PAGE: u32 = 15;

/// Upper bound on page size for ticket listings.
pub const MAX_PER_PAGE: u32 = 100;

/// Search, filter, sort, and pagination options for ticket listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketFilter {
    /// Substring matched against subject, body, and explanation.
    pub search: Option<String>,
    pub status: Option<TicketStatus>,
    pub category_id: Option<String>,
    pub min_confidence: Option<u8>,
    pub max_confidence: Option<u8>,
    pub created_by: Option<String>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    /// 1-based page number.
    pub page: u32,
    pub per_page: u32,
}

impl Default for TicketFilter {
    fn default() -> Self {
        Self {
            search: None,
            status: None,
            category_id: None,
            min_confidence: None,
            max_confidence: None,
            created_by: None,
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl TicketFilter {
    /// Page size clamped to `1..=MAX_PER_PAGE`.
    pub fn effective_per_page(&self) -> u32 {
        self.per_page.clamp(1, MAX_PER_PAGE)
    }

    /// 1-based page number, never zero.
    pub fn effective_page(&self) -> u32 {
        self.page.max(1)
    }

    /// Row offset for the effective page.
    pub fn offset(&self) -> u64 {
        u64::from(self.effective_page() - 1) * u64::from(self.effective_per_page())
    }
}

/// Pagination metadata for a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: u32,
    pub last_page: u32,
    pub per_page: u32,
    pub total: u64,
    /// 1-based index of the first item on this page, `None` when empty.
    pub from: Option<u64>,
    /// 1-based index of the last item on this page, `None` when empty.
    pub to: Option<u64>,
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// Build a page and derive its metadata from the filter and total count.
    pub fn new(items: Vec<T>, total: u64, filter: &TicketFilter) -> Self {
        let per_page = filter.effective_per_page();
        let current_page = filter.effective_page();
        let last_page = total.div_ceil(u64::from(per_page)).max(1) as u32;
        let offset = filter.offset();
        let (from, to) = if items.is_empty() {
            (None, None)
        } else {
            (Some(offset + 1), Some(offset + items.len() as u64))
        };
        Self {
            items,
            pagination: Pagination {
                current_page,
                last_page,
                per_page,
                total,
                from,
                to,
            },
        }
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn ticket_status_uses_snake_case_everywhere() {
        assert_eq!(TicketStatus::InProgress.to_string(), "in_progress");
        assert_eq!(
            TicketStatus::from_str("in_progress").unwrap(),
            TicketStatus::InProgress
        );
        let json = serde_json::to_string(&TicketStatus::Resolved).unwrap();
        assert_eq!(json, "\"resolved\"");
        assert!(TicketStatus::from_str("pending").is_err());
    }

    #[test]
    fn classification_source_is_not_serialized() {
        let result = ClassificationResult {
            category: "Billing".into(),
            explanation: "Invoice question".into(),
            confidence: 80,
            source: ClassificationSource::Fallback,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "category": "Billing",
                "explanation": "Invoice question",
                "confidence": 80
            })
        );
    }

    #[test]
    fn patch_distinguishes_absent_from_null() {
        let patch: TicketPatch =
            serde_json::from_str(r#"{"category_id": null, "subject": "New"}"#).unwrap();
        assert_eq!(patch.category_id, Some(None));
        assert_eq!(patch.subject, Some(Some("New".to_string())));
        assert_eq!(patch.explanation, None);
    }

    #[test]
    fn filter_clamps_page_size() {
        let filter = TicketFilter {
            per_page: 500,
            page: 0,
            ..TicketFilter::default()
        };
        assert_eq!(filter.effective_per_page(), MAX_PER_PAGE);
        assert_eq!(filter.effective_page(), 1);
        assert_eq!(filter.offset(), 0);
    }

    #[test]
    fn page_metadata_for_middle_page() {
        let filter = TicketFilter {
            page: 2,
            per_page: 10,
            ..TicketFilter::default()
        };
        let page = Page::new(vec![(); 10], 25, &filter);
        assert_eq!(page.pagination.current_page, 2);
        assert_eq!(page.pagination.last_page, 3);
        assert_eq!(page.pagination.from, Some(11));
        assert_eq!(page.pagination.to, Some(20));
    }

    #[test]
    fn empty_page_has_no_bounds() {
        let page: Page<()> = Page::new(vec![], 0, &TicketFilter::default());
        assert_eq!(page.pagination.last_page, 1);
        assert_eq!(page.pagination.from, None);
        assert_eq!(page.pagination.to, None);
    }

    #[test]
    fn sort_order_parses_case_insensitively() {
        assert_eq!(SortOrder::from_str("ASC").unwrap(), SortOrder::Asc);
        assert_eq!(SortField::from_str("updated_at").unwrap(), SortField::UpdatedAt);
    }
}
