// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Category queries.

use rusqlite::{OptionalExtension, params};
use triage_core::TriageError;
use triage_core::types::{Category, CategoryWithCount};

use crate::database::{Database, map_tr_err};

fn category_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
        updated_at: row.get(3)?,
    })
}

/// Insert a category with a fresh id.
pub async fn create_category(db: &Database, name: &str) -> Result<Category, TriageError> {
    let now = crate::now_timestamp();
    let category = Category {
        id: uuid::Uuid::new_v4().to_string(),
        name: name.to_string(),
        created_at: now.clone(),
        updated_at: now,
    };
    let row = category.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO categories (id, name, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
                params![row.id, row.name, row.created_at, row.updated_at],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;
    Ok(category)
}

/// Insert each name that does not exist yet. Returns how many were added.
pub async fn ensure_categories(db: &Database, names: &[&str]) -> Result<usize, TriageError> {
    let names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
    let now = crate::now_timestamp();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let mut inserted = 0;
            {
                let mut stmt = tx.prepare(
                    "INSERT OR IGNORE INTO categories (id, name, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?3)",
                )?;
                for name in &names {
                    inserted += stmt.execute(params![uuid::Uuid::new_v4().to_string(), name, now])?;
                }
            }
            tx.commit()?;
            Ok(inserted)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_category(db: &Database, id: &str) -> Result<Option<Category>, TriageError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT id, name, created_at, updated_at FROM categories WHERE id = ?1",
                params![id],
                category_from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Exact, case-sensitive lookup by name.
pub async fn find_by_name(db: &Database, name: &str) -> Result<Option<Category>, TriageError> {
    let name = name.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT id, name, created_at, updated_at FROM categories WHERE name = ?1",
                params![name],
                category_from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// All category names, ordered by name.
pub async fn category_names(db: &Database) -> Result<Vec<String>, TriageError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare("SELECT name FROM categories ORDER BY name")?;
            let rows = stmt.query_map([], |row| row.get(0))?;
            rows.collect::<Result<Vec<String>, _>>()
        })
        .await
        .map_err(map_tr_err)
}

/// All categories with the number of tickets referencing each.
pub async fn list_with_counts(db: &Database) -> Result<Vec<CategoryWithCount>, TriageError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT c.id, c.name, c.created_at, c.updated_at, COUNT(t.id)
                 FROM categories c
                 LEFT JOIN tickets t ON t.category_id = c.id
                 GROUP BY c.id
                 ORDER BY c.name",
            )?;
            let rows = stmt.query_map([], |row| {
                let count: i64 = row.get(4)?;
                Ok(CategoryWithCount {
                    category: category_from_row(row)?,
                    tickets_count: count.max(0) as u64,
                })
            })?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}
