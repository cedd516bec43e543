// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Whether a new classification may overwrite a ticket's category.
//!
//! A ticket that was classified before (it has an explanation) and whose
//! category no longer matches the suggestion is treated as manually
//! recategorized; its category is kept. Explanation and confidence are
//! refreshed regardless.

use strum::Display;
use triage_core::types::{Category, Ticket};

/// Why the category was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SkipReason {
    #[strum(serialize = "category not found")]
    CategoryNotFound,
    #[strum(serialize = "user has manually set category")]
    ManualOverride,
}

/// Outcome of the category update policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryDecision {
    /// Write this category id.
    Assign(String),
    /// Leave the current category.
    Keep(SkipReason),
}

impl CategoryDecision {
    pub fn updates_category(&self) -> bool {
        matches!(self, CategoryDecision::Assign(_))
    }
}

pub fn decide(ticket: &Ticket, suggested: Option<&Category>) -> CategoryDecision {
    let Some(suggested) = suggested else {
        return CategoryDecision::Keep(SkipReason::CategoryNotFound);
    };

    let never_classified = ticket.explanation.as_deref().is_none_or(str::is_empty);
    match ticket.category_id.as_deref() {
        None => CategoryDecision::Assign(suggested.id.clone()),
        Some(_) if never_classified => CategoryDecision::Assign(suggested.id.clone()),
        Some(current) if current == suggested.id => CategoryDecision::Assign(suggested.id.clone()),
        Some(_) => CategoryDecision::Keep(SkipReason::ManualOverride),
    }
}

/// Boolean view of [`decide`].
pub fn should_update_category(ticket: &Ticket, suggested: Option<&Category>) -> bool {
    decide(ticket, suggested).updates_category()
}
