//! SQLite backend for the document store.
//!
//! Uses a single `documents` table. Timestamps are stored as RFC 3339 text
//! and assigned at insert time, so `created_time` is non-decreasing with the
//! autoincrement id. The database runs in WAL mode to support concurrent
//! readers and writers.

use async_trait::async_trait;
use chrono::Utc;
use docstash_core::document::{Document, DocumentFilter};
use docstash_core::error::StoreError;
use docstash_core::store::DocumentStore;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info};

/// A SQLite-backed document store.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new SQLite store from a file path.
    ///
    /// The database and table are created automatically. Pass
    /// `"sqlite::memory:"` for an in-process ephemeral database (useful for
    /// tests).
    pub async fn new(path: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(path)
            .map_err(|e| StoreError::Storage(format!("Invalid SQLite path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Storage(format!("Failed to open SQLite: {e}")))?;

        let store = Self { pool };
        store.run_migrations().await?;
        info!("SQLite document store initialized at {path}");
        Ok(store)
    }

    /// Run schema migrations — creates the documents table and index.
    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                doc_type     TEXT,
                identifier   TEXT,
                data         TEXT NOT NULL,
                created_time TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("documents table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_documents_created_time
             ON documents(created_time DESC)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("created_time index: {e}")))?;

        debug!("SQLite migrations complete");
        Ok(())
    }

    /// Parse a `Document` from a SQLite row.
    ///
    /// A payload that no longer parses as JSON is returned as a raw string
    /// rather than an error.
    fn row_to_document(row: &sqlx::sqlite::SqliteRow) -> Result<Document, StoreError> {
        let id: i64 = row
            .try_get("id")
            .map_err(|e| StoreError::QueryFailed(format!("id column: {e}")))?;
        let doc_type: Option<String> = row
            .try_get("doc_type")
            .map_err(|e| StoreError::QueryFailed(format!("doc_type column: {e}")))?;
        let identifier: Option<String> = row
            .try_get("identifier")
            .map_err(|e| StoreError::QueryFailed(format!("identifier column: {e}")))?;
        let data_text: String = row
            .try_get("data")
            .map_err(|e| StoreError::QueryFailed(format!("data column: {e}")))?;
        let created_time_str: String = row
            .try_get("created_time")
            .map_err(|e| StoreError::QueryFailed(format!("created_time column: {e}")))?;

        let data = serde_json::from_str(&data_text)
            .unwrap_or_else(|_| serde_json::Value::String(data_text));

        let created_time = chrono::DateTime::parse_from_rfc3339(&created_time_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(Document {
            id,
            doc_type,
            identifier,
            data,
            created_time,
        })
    }

    /// Escape `LIKE` wildcards so user search text matches literally.
    fn escape_like(text: &str) -> String {
        text.replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_")
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn insert(
        &self,
        doc_type: Option<&str>,
        identifier: Option<&str>,
        data: &serde_json::Value,
    ) -> Result<i64, StoreError> {
        let json_text = serde_json::to_string(data)
            .map_err(|e| StoreError::Storage(format!("Payload serialization: {e}")))?;
        let created_time = Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO documents (doc_type, identifier, data, created_time)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(doc_type)
        .bind(identifier)
        .bind(&json_text)
        .bind(&created_time)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("INSERT failed: {e}")))?;

        let id = result.last_insert_rowid();
        debug!(id, doc_type, "Stored document");
        Ok(id)
    }

    async fn query(&self, filter: DocumentFilter) -> Result<Vec<Document>, StoreError> {
        let mut sql = String::from(
            "SELECT id, doc_type, identifier, data, created_time
             FROM documents WHERE 1=1",
        );
        if filter.doc_type.is_some() {
            sql.push_str(" AND doc_type = ?");
        }
        if filter.search_text.is_some() {
            sql.push_str(" AND data LIKE ? ESCAPE '\\'");
        }
        sql.push_str(" ORDER BY created_time DESC, id DESC LIMIT ?");

        let mut db_query = sqlx::query(&sql);
        if let Some(ref doc_type) = filter.doc_type {
            db_query = db_query.bind(doc_type);
        }
        if let Some(ref search_text) = filter.search_text {
            db_query = db_query.bind(format!("%{}%", Self::escape_like(search_text)));
        }
        db_query = db_query.bind(filter.limit as i64);

        let rows = db_query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("SELECT failed: {e}")))?;

        rows.iter().map(Self::row_to_document).collect()
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS cnt FROM documents")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("COUNT: {e}")))?;

        let cnt: i64 = row
            .try_get("cnt")
            .map_err(|e| StoreError::QueryFailed(format!("cnt column: {e}")))?;

        Ok(cnt as u64)
    }
}
