// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence trait for tickets and categories.

use async_trait::async_trait;

use crate::error::TriageError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    Category, CategoryWithCount, ClassificationUpdate, Page, Ticket, TicketChanges, TicketDraft,
    TicketFilter, TicketWithCategory,
};

/// Adapter for ticket and category persistence.
#[async_trait]
pub trait TicketStore: PluginAdapter {
    /// Fetch a ticket by id.
    async fn get_ticket(&self, id: &str) -> Result<Option<Ticket>, TriageError>;

    /// Fetch a ticket with its category relation resolved.
    async fn get_ticket_with_category(
        &self,
        id: &str,
    ) -> Result<Option<TicketWithCategory>, TriageError>;

    /// Insert a new ticket and return it.
    async fn create_ticket(&self, draft: TicketDraft) -> Result<Ticket, TriageError>;

    /// Apply a partial update. Returns `None` if the ticket does not exist.
    async fn update_ticket(
        &self,
        id: &str,
        changes: TicketChanges,
    ) -> Result<Option<Ticket>, TriageError>;

    /// Search, filter, sort, and paginate tickets.
    async fn list_tickets(
        &self,
        filter: &TicketFilter,
    ) -> Result<Page<TicketWithCategory>, TriageError>;

    /// Write classification fields in a single atomic update.
    async fn apply_classification(
        &self,
        ticket_id: &str,
        update: &ClassificationUpdate,
    ) -> Result<(), TriageError>;

    /// All categories with their ticket counts, ordered by name.
    async fn list_categories(&self) -> Result<Vec<CategoryWithCount>, TriageError>;

    /// The current category vocabulary, ordered by name.
    async fn category_names(&self) -> Result<Vec<String>, TriageError>;

    /// Exact, case-sensitive lookup by name.
    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>, TriageError>;

    async fn get_category(&self, id: &str) -> Result<Option<Category>, TriageError>;

    /// Insert a category. Names are unique.
    async fn create_category(&self, name: &str) -> Result<Category, TriageError>;
}
