// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory `TicketStore` for tests that do not need SQLite.

use std::cmp::Ordering;

use async_trait::async_trait;
use tokio::sync::Mutex;

use triage_core::types::{
    Category, CategoryWithCount, ClassificationUpdate, HealthStatus, Page, SortField, SortOrder,
    Ticket, TicketChanges, TicketDraft, TicketFilter, TicketWithCategory,
};
use triage_core::{PluginAdapter, TicketStore, TriageError};

#[derive(Default)]
struct MemoryState {
    tickets: Vec<Ticket>,
    categories: Vec<Category>,
}

impl MemoryState {
    fn with_category(&self, ticket: &Ticket) -> TicketWithCategory {
        let category = ticket
            .category_id
            .as_ref()
            .and_then(|id| self.categories.iter().find(|c| &c.id == id))
            .cloned();
        TicketWithCategory {
            ticket: ticket.clone(),
            category,
        }
    }
}

fn now() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

fn matches_filter(ticket: &Ticket, filter: &TicketFilter) -> bool {
    if let Some(search) = &filter.search {
        let needle = search.to_lowercase();
        let hit = ticket.subject.to_lowercase().contains(&needle)
            || ticket.body.to_lowercase().contains(&needle)
            || ticket
                .explanation
                .as_ref()
                .is_some_and(|e| e.to_lowercase().contains(&needle));
        if !hit {
            return false;
        }
    }
    if filter.status.is_some_and(|s| s != ticket.status) {
        return false;
    }
    if filter.category_id.is_some() && filter.category_id != ticket.category_id {
        return false;
    }
    if let Some(min) = filter.min_confidence
        && !ticket.confidence.is_some_and(|c| c >= min)
    {
        return false;
    }
    if let Some(max) = filter.max_confidence
        && !ticket.confidence.is_some_and(|c| c <= max)
    {
        return false;
    }
    if filter.created_by.is_some() && filter.created_by != ticket.created_by {
        return false;
    }
    true
}

fn compare(a: &Ticket, b: &Ticket, field: SortField) -> Ordering {
    let primary = match field {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortField::Subject => a.subject.cmp(&b.subject),
        SortField::Status => a.status.as_ref().cmp(b.status.as_ref()),
        SortField::Confidence => a.confidence.cmp(&b.confidence),
    };
    primary.then_with(|| a.id.cmp(&b.id))
}

/// A [`TicketStore`] backed by vectors behind a mutex.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<MemoryState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given category names.
    pub async fn with_categories(names: &[&str]) -> Self {
        let store = Self::new();
        for name in names {
            // Names are unique in the input; a duplicate would be a test bug.
            let _ = store.create_category(name).await;
        }
        store
    }
}

#[async_trait]
impl PluginAdapter for InMemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> Result<HealthStatus, TriageError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl TicketStore for InMemoryStore {
    async fn get_ticket(&self, id: &str) -> Result<Option<Ticket>, TriageError> {
        let state = self.state.lock().await;
        Ok(state.tickets.iter().find(|t| t.id == id).cloned())
    }

    async fn get_ticket_with_category(
        &self,
        id: &str,
    ) -> Result<Option<TicketWithCategory>, TriageError> {
        let state = self.state.lock().await;
        Ok(state
            .tickets
            .iter()
            .find(|t| t.id == id)
            .map(|t| state.with_category(t)))
    }

    async fn create_ticket(&self, draft: TicketDraft) -> Result<Ticket, TriageError> {
        let now = now();
        let ticket = Ticket {
            id: uuid::Uuid::new_v4().to_string(),
            category_id: draft.category_id,
            subject: draft.subject,
            body: draft.body,
            status: draft.status,
            explanation: draft.explanation,
            confidence: draft.confidence,
            created_by: draft.created_by,
            updated_by: draft.updated_by,
            created_at: now.clone(),
            updated_at: now,
        };
        self.state.lock().await.tickets.push(ticket.clone());
        Ok(ticket)
    }

    async fn update_ticket(
        &self,
        id: &str,
        changes: TicketChanges,
    ) -> Result<Option<Ticket>, TriageError> {
        let mut state = self.state.lock().await;
        let Some(ticket) = state.tickets.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        if let Some(category_id) = changes.category_id {
            ticket.category_id = category_id;
        }
        if let Some(subject) = changes.subject {
            ticket.subject = subject;
        }
        if let Some(body) = changes.body {
            ticket.body = body;
        }
        if let Some(status) = changes.status {
            ticket.status = status;
        }
        if let Some(explanation) = changes.explanation {
            ticket.explanation = explanation;
        }
        if let Some(confidence) = changes.confidence {
            ticket.confidence = confidence;
        }
        if let Some(created_by) = changes.created_by {
            ticket.created_by = created_by;
        }
        if let Some(updated_by) = changes.updated_by {
            ticket.updated_by = updated_by;
        }
        ticket.updated_at = now();
        Ok(Some(ticket.clone()))
    }

    async fn list_tickets(
        &self,
        filter: &TicketFilter,
    ) -> Result<Page<TicketWithCategory>, TriageError> {
        let state = self.state.lock().await;
        let mut hits: Vec<&Ticket> = state.tickets.iter().filter(|t| matches_filter(t, filter)).collect();
        hits.sort_by(|a, b| {
            let ord = compare(a, b, filter.sort_by);
            match filter.sort_order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
        let total = hits.len() as u64;
        let items = hits
            .into_iter()
            .skip(filter.offset() as usize)
            .take(filter.effective_per_page() as usize)
            .map(|t| state.with_category(t))
            .collect();
        Ok(Page::new(items, total, filter))
    }

    async fn apply_classification(
        &self,
        ticket_id: &str,
        update: &ClassificationUpdate,
    ) -> Result<(), TriageError> {
        let mut state = self.state.lock().await;
        let ticket = state
            .tickets
            .iter_mut()
            .find(|t| t.id == ticket_id)
            .ok_or_else(|| TriageError::ticket_not_found(ticket_id))?;
        ticket.explanation = Some(update.explanation.clone());
        ticket.confidence = Some(update.confidence);
        if let Some(category_id) = &update.category_id {
            ticket.category_id = Some(category_id.clone());
        }
        ticket.updated_at = now();
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<CategoryWithCount>, TriageError> {
        let state = self.state.lock().await;
        let mut categories: Vec<CategoryWithCount> = state
            .categories
            .iter()
            .map(|c| CategoryWithCount {
                category: c.clone(),
                tickets_count: state
                    .tickets
                    .iter()
                    .filter(|t| t.category_id.as_ref() == Some(&c.id))
                    .count() as u64,
            })
            .collect();
        categories.sort_by(|a, b| a.category.name.cmp(&b.category.name));
        Ok(categories)
    }

    async fn category_names(&self) -> Result<Vec<String>, TriageError> {
        let state = self.state.lock().await;
        let mut names: Vec<String> = state.categories.iter().map(|c| c.name.clone()).collect();
        names.sort();
        Ok(names)
    }

    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>, TriageError> {
        let state = self.state.lock().await;
        Ok(state.categories.iter().find(|c| c.name == name).cloned())
    }

    async fn get_category(&self, id: &str) -> Result<Option<Category>, TriageError> {
        let state = self.state.lock().await;
        Ok(state.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn create_category(&self, name: &str) -> Result<Category, TriageError> {
        let mut state = self.state.lock().await;
        if state.categories.iter().any(|c| c.name == name) {
            return Err(TriageError::Storage {
                source: format!("category name already exists: {name}").into(),
            });
        }
        let now = now();
        let category = Category {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            created_at: now.clone(),
            updated_at: now,
        };
        state.categories.push(category.clone());
        Ok(category)
    }
}
