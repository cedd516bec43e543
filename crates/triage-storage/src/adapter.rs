// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the TicketStore trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use triage_config::model::StorageConfig;
use triage_core::types::{
    Category, CategoryWithCount, ClassificationUpdate, DEFAULT_CATEGORIES, HealthStatus, Page,
    Ticket, TicketChanges, TicketDraft, TicketFilter, TicketWithCategory,
};
use triage_core::{PluginAdapter, TicketStore, TriageError};

use crate::database::Database;
use crate::queries;

/// SQLite-backed ticket store.
///
/// Wraps a [`Database`] handle and delegates to the typed query modules.
/// The database is opened on [`SqliteStorage::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`](Self::initialize) is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Create, initialize, and return a store in one step.
    pub async fn open(config: StorageConfig) -> Result<Self, TriageError> {
        let storage = Self::new(config);
        storage.initialize().await?;
        Ok(storage)
    }

    /// Open the database and run migrations.
    pub async fn initialize(&self) -> Result<(), TriageError> {
        let path = self.config.database_path.clone();
        let db = Database::open_with_options(&path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| TriageError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    /// Checkpoint the WAL. The connection closes when the store is dropped.
    pub async fn close(&self) -> Result<(), TriageError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    /// Insert the default category vocabulary, skipping names that exist.
    pub async fn seed_default_categories(&self) -> Result<usize, TriageError> {
        let inserted = queries::categories::ensure_categories(self.db()?, &DEFAULT_CATEGORIES).await?;
        info!(inserted, "seeded default categories");
        Ok(inserted)
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, TriageError> {
        self.db.get().ok_or_else(|| TriageError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn health_check(&self) -> Result<HealthStatus, TriageError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl TicketStore for SqliteStorage {
    async fn get_ticket(&self, id: &str) -> Result<Option<Ticket>, TriageError> {
        queries::tickets::get_ticket(self.db()?, id).await
    }

    async fn get_ticket_with_category(
        &self,
        id: &str,
    ) -> Result<Option<TicketWithCategory>, TriageError> {
        queries::tickets::get_ticket_with_category(self.db()?, id).await
    }

    async fn create_ticket(&self, draft: TicketDraft) -> Result<Ticket, TriageError> {
        queries::tickets::create_ticket(self.db()?, draft).await
    }

    async fn update_ticket(
        &self,
        id: &str,
        changes: TicketChanges,
    ) -> Result<Option<Ticket>, TriageError> {
        queries::tickets::update_ticket(self.db()?, id, changes).await
    }

    async fn list_tickets(
        &self,
        filter: &TicketFilter,
    ) -> Result<Page<TicketWithCategory>, TriageError> {
        queries::tickets::list_tickets(self.db()?, filter).await
    }

    async fn apply_classification(
        &self,
        ticket_id: &str,
        update: &ClassificationUpdate,
    ) -> Result<(), TriageError> {
        queries::tickets::apply_classification(self.db()?, ticket_id, update).await
    }

    async fn list_categories(&self) -> Result<Vec<CategoryWithCount>, TriageError> {
        queries::categories::list_with_counts(self.db()?).await
    }

    async fn category_names(&self) -> Result<Vec<String>, TriageError> {
        queries::categories::category_names(self.db()?).await
    }

    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>, TriageError> {
        queries::categories::find_by_name(self.db()?, name).await
    }

    async fn get_category(&self, id: &str) -> Result<Option<Category>, TriageError> {
        queries::categories::get_category(self.db()?, id).await
    }

    async fn create_category(&self, name: &str) -> Result<Category, TriageError> {
        queries::categories::create_category(self.db()?, name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use triage_core::TicketStatus;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    #[tokio::test]
    async fn initialize_opens_database_at_configured_path() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("init_test.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        assert_eq!(storage.name(), "sqlite");
        storage.initialize().await.unwrap();
        assert!(db_path.exists(), "database file should be created");
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("double_init.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        storage.initialize().await.unwrap();
        assert!(storage.initialize().await.is_err(), "second initialize should fail");
    }

    #[tokio::test]
    async fn health_check_requires_initialize() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("health.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        assert!(storage.health_check().await.is_err());
        storage.initialize().await.unwrap();
        assert_eq!(storage.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn seed_inserts_default_vocabulary_once() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("seed.db");
        let storage = SqliteStorage::open(make_config(db_path.to_str().unwrap()))
            .await
            .unwrap();

        assert_eq!(storage.seed_default_categories().await.unwrap(), 3);
        assert_eq!(storage.seed_default_categories().await.unwrap(), 0);
        assert_eq!(
            storage.category_names().await.unwrap(),
            vec!["Bug Reports", "General Inquiry", "Technical Support"]
        );
    }

    #[tokio::test]
    async fn classification_roundtrip_through_store() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("classify.db");
        let storage = SqliteStorage::open(make_config(db_path.to_str().unwrap()))
            .await
            .unwrap();
        storage.seed_default_categories().await.unwrap();

        let ticket = storage
            .create_ticket(TicketDraft {
                category_id: None,
                subject: "App crashes".into(),
                body: "Crashes on launch".into(),
                status: TicketStatus::Open,
                explanation: None,
                confidence: None,
                created_by: None,
                updated_by: None,
            })
            .await
            .unwrap();

        let bugs = storage
            .find_category_by_name("Bug Reports")
            .await
            .unwrap()
            .unwrap();
        storage
            .apply_classification(
                &ticket.id,
                &ClassificationUpdate {
                    explanation: "Crash report".into(),
                    confidence: 88,
                    category_id: Some(bugs.id.clone()),
                },
            )
            .await
            .unwrap();

        let resolved = storage
            .get_ticket_with_category(&ticket.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.category.map(|c| c.name).as_deref(), Some("Bug Reports"));
        assert_eq!(resolved.ticket.confidence, Some(88));

        let counts = storage.list_categories().await.unwrap();
        let bug_count = counts
            .iter()
            .find(|c| c.category.id == bugs.id)
            .map(|c| c.tickets_count);
        assert_eq!(bug_count, Some(1));

        storage.close().await.unwrap();
    }
}
