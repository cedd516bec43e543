// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket CRUD, search, and classification write-back.

use std::str::FromStr;

use rusqlite::types::Value;
use rusqlite::{OptionalExtension, params, params_from_iter};
use triage_core::TriageError;
use triage_core::types::{
    Category, ClassificationUpdate, Page, SortField, SortOrder, Ticket, TicketChanges,
    TicketDraft, TicketFilter, TicketStatus, TicketWithCategory,
};

use crate::database::{Database, map_tr_err};

const TICKET_COLUMNS: &str = "t.id, t.category_id, t.subject, t.body, t.status, t.explanation, \
     t.confidence, t.created_by, t.updated_by, t.created_at, t.updated_at";

const CATEGORY_COLUMNS: &str = "c.id, c.name, c.created_at, c.updated_at";

fn ticket_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Ticket> {
    let status: String = row.get(4)?;
    let status = TicketStatus::from_str(&status).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Ticket {
        id: row.get(0)?,
        category_id: row.get(1)?,
        subject: row.get(2)?,
        body: row.get(3)?,
        status,
        explanation: row.get(5)?,
        confidence: row.get(6)?,
        created_by: row.get(7)?,
        updated_by: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

/// Reads a ticket followed by the LEFT JOINed category columns.
fn ticket_with_category_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TicketWithCategory> {
    let ticket = ticket_from_row(row)?;
    let category_id: Option<String> = row.get(11)?;
    let category = match category_id {
        Some(id) => Some(Category {
            id,
            name: row.get(12)?,
            created_at: row.get(13)?,
            updated_at: row.get(14)?,
        }),
        None => None,
    };
    Ok(TicketWithCategory { ticket, category })
}

fn select_ticket(conn: &rusqlite::Connection, id: &str) -> rusqlite::Result<Option<Ticket>> {
    conn.query_row(
        &format!("SELECT {TICKET_COLUMNS} FROM tickets t WHERE t.id = ?1"),
        params![id],
        ticket_from_row,
    )
    .optional()
}

/// Insert a new ticket with a fresh id and timestamps.
pub async fn create_ticket(db: &Database, draft: TicketDraft) -> Result<Ticket, TriageError> {
    let now = crate::now_timestamp();
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
    let row = ticket.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO tickets (id, category_id, subject, body, status, explanation, confidence,
                                      created_by, updated_by, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    row.id,
                    row.category_id,
                    row.subject,
                    row.body,
                    row.status.to_string(),
                    row.explanation,
                    row.confidence,
                    row.created_by,
                    row.updated_by,
                    row.created_at,
                    row.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;
    Ok(ticket)
}

/// Get a ticket by ID.
pub async fn get_ticket(db: &Database, id: &str) -> Result<Option<Ticket>, TriageError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| select_ticket(conn, &id))
        .await
        .map_err(map_tr_err)
}

/// Get a ticket with its category relation resolved.
pub async fn get_ticket_with_category(
    db: &Database,
    id: &str,
) -> Result<Option<TicketWithCategory>, TriageError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!(
                    "SELECT {TICKET_COLUMNS}, {CATEGORY_COLUMNS}
                     FROM tickets t LEFT JOIN categories c ON c.id = t.category_id
                     WHERE t.id = ?1"
                ),
                params![id],
                ticket_with_category_from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Apply a partial update and return the updated row, or `None` if the
/// ticket does not exist.
pub async fn update_ticket(
    db: &Database,
    id: &str,
    changes: TicketChanges,
) -> Result<Option<Ticket>, TriageError> {
    let id = id.to_string();
    let now = crate::now_timestamp();
    db.connection()
        .call(move |conn| {
            let mut sets: Vec<&str> = Vec::new();
            let mut values: Vec<Value> = Vec::new();

            if let Some(category_id) = changes.category_id {
                sets.push("category_id = ?");
                values.push(opt_text(category_id));
            }
            if let Some(subject) = changes.subject {
                sets.push("subject = ?");
                values.push(Value::Text(subject));
            }
            if let Some(body) = changes.body {
                sets.push("body = ?");
                values.push(Value::Text(body));
            }
            if let Some(status) = changes.status {
                sets.push("status = ?");
                values.push(Value::Text(status.to_string()));
            }
            if let Some(explanation) = changes.explanation {
                sets.push("explanation = ?");
                values.push(opt_text(explanation));
            }
            if let Some(confidence) = changes.confidence {
                sets.push("confidence = ?");
                values.push(confidence.map_or(Value::Null, |c| Value::Integer(i64::from(c))));
            }
            if let Some(created_by) = changes.created_by {
                sets.push("created_by = ?");
                values.push(opt_text(created_by));
            }
            if let Some(updated_by) = changes.updated_by {
                sets.push("updated_by = ?");
                values.push(opt_text(updated_by));
            }
            sets.push("updated_at = ?");
            values.push(Value::Text(now));
            values.push(Value::Text(id.clone()));

            let sql = format!("UPDATE tickets SET {} WHERE id = ?", sets.join(", "));
            let affected = conn.execute(&sql, params_from_iter(values.iter()))?;
            if affected == 0 {
                return Ok(None);
            }
            select_ticket(conn, &id)
        })
        .await
        .map_err(map_tr_err)
}

fn opt_text(value: Option<String>) -> Value {
    value.map_or(Value::Null, Value::Text)
}

/// Write explanation, confidence, and (optionally) category in one statement.
///
/// A `None` category id leaves the current category untouched.
pub async fn apply_classification(
    db: &Database,
    ticket_id: &str,
    update: &ClassificationUpdate,
) -> Result<(), TriageError> {
    let id = ticket_id.to_string();
    let update = update.clone();
    let now = crate::now_timestamp();
    let affected = db
        .connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE tickets
                 SET explanation = ?1,
                     confidence = ?2,
                     category_id = COALESCE(?3, category_id),
                     updated_at = ?4
                 WHERE id = ?5",
                params![update.explanation, update.confidence, update.category_id, now, id],
            )
        })
        .await
        .map_err(map_tr_err)?;
    if affected == 0 {
        return Err(TriageError::ticket_not_found(ticket_id));
    }
    Ok(())
}

/// Builds the shared WHERE clause for listing and counting.
fn filter_clause(filter: &TicketFilter) -> (String, Vec<Value>) {
    let mut conditions: Vec<&str> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        conditions.push("(t.subject LIKE ? OR t.body LIKE ? OR t.explanation LIKE ?)");
        let pattern = format!("%{search}%");
        for _ in 0..3 {
            values.push(Value::Text(pattern.clone()));
        }
    }
    if let Some(status) = filter.status {
        conditions.push("t.status = ?");
        values.push(Value::Text(status.to_string()));
    }
    if let Some(category_id) = &filter.category_id {
        conditions.push("t.category_id = ?");
        values.push(Value::Text(category_id.clone()));
    }
    if let Some(min) = filter.min_confidence {
        conditions.push("t.confidence >= ?");
        values.push(Value::Integer(i64::from(min)));
    }
    if let Some(max) = filter.max_confidence {
        conditions.push("t.confidence <= ?");
        values.push(Value::Integer(i64::from(max)));
    }
    if let Some(created_by) = &filter.created_by {
        conditions.push("t.created_by = ?");
        values.push(Value::Text(created_by.clone()));
    }

    let clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    (clause, values)
}

fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::CreatedAt => "t.created_at",
        SortField::UpdatedAt => "t.updated_at",
        SortField::Subject => "t.subject",
        SortField::Status => "t.status",
        SortField::Confidence => "t.confidence",
    }
}

/// Search, filter, sort, and paginate tickets.
pub async fn list_tickets(
    db: &Database,
    filter: &TicketFilter,
) -> Result<Page<TicketWithCategory>, TriageError> {
    let (clause, values) = filter_clause(filter);
    let direction = match filter.sort_order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    };
    let column = sort_column(filter.sort_by);
    let limit = i64::from(filter.effective_per_page());
    let offset = i64::try_from(filter.offset()).unwrap_or(i64::MAX);

    let (items, total) = db
        .connection()
        .call(move |conn| {
            let total: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM tickets t {clause}"),
                params_from_iter(values.iter()),
                |row| row.get(0),
            )?;

            let sql = format!(
                "SELECT {TICKET_COLUMNS}, {CATEGORY_COLUMNS}
                 FROM tickets t LEFT JOIN categories c ON c.id = t.category_id
                 {clause}
                 ORDER BY {column} {direction}, t.id {direction}
                 LIMIT ? OFFSET ?"
            );
            let mut page_values = values;
            page_values.push(Value::Integer(limit));
            page_values.push(Value::Integer(offset));

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(
                params_from_iter(page_values.iter()),
                ticket_with_category_from_row,
            )?;
            let items = rows.collect::<Result<Vec<_>, _>>()?;
            Ok((items, total.max(0) as u64))
        })
        .await
        .map_err(map_tr_err)?;

    Ok(Page::new(items, total, filter))
}
