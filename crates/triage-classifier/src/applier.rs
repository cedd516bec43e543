// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Writes a classification result back onto a ticket.

use std::sync::Arc;

use tracing::info;
use triage_core::types::{ClassificationResult, ClassificationUpdate, Ticket, TicketWithCategory};
use triage_core::{TicketStore, TriageError};

use crate::policy::{self, CategoryDecision};

/// Persists explanation and confidence, and the category when policy allows.
pub struct TicketUpdateApplier {
    store: Arc<dyn TicketStore>,
}

impl TicketUpdateApplier {
    pub fn new(store: Arc<dyn TicketStore>) -> Self {
        Self { store }
    }

    /// Apply `result` to `ticket` and return the refreshed ticket.
    ///
    /// `ticket` is the pre-classification snapshot; the manual-override
    /// check runs against it, not against what is stored afterwards.
    pub async fn apply(
        &self,
        ticket: &Ticket,
        result: &ClassificationResult,
    ) -> Result<TicketWithCategory, TriageError> {
        let suggested = self.store.find_category_by_name(&result.category).await?;
        let decision = policy::decide(ticket, suggested.as_ref());

        let category_id = match &decision {
            CategoryDecision::Assign(id) => {
                info!(
                    ticket_id = %ticket.id,
                    category = %result.category,
                    confidence = result.confidence,
                    category_updated = true,
                    "applied full classification to ticket"
                );
                Some(id.clone())
            }
            CategoryDecision::Keep(reason) => {
                info!(
                    ticket_id = %ticket.id,
                    suggested_category = %result.category,
                    confidence = result.confidence,
                    category_updated = false,
                    reason = %reason,
                    "applied partial classification to ticket"
                );
                None
            }
        };

        let update = ClassificationUpdate {
            explanation: result.explanation.clone(),
            confidence: result.confidence,
            category_id,
        };
        self.store.apply_classification(&ticket.id, &update).await?;

        self.store
            .get_ticket_with_category(&ticket.id)
            .await?
            .ok_or_else(|| TriageError::ticket_not_found(&ticket.id))
    }
}
