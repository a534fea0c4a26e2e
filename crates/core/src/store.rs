//! DocumentStore trait — the persistence seam.
//!
//! A store is an append-only log of JSON documents behind insert/query.
//! There is deliberately no update or delete: the system never mutates a
//! document after insertion.
//!
//! Implementations: SQLite (production), stubs in tests.

use crate::document::{Document, DocumentFilter};
use crate::error::StoreError;
use async_trait::async_trait;

/// The core DocumentStore trait.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// The backend name (e.g., "sqlite").
    fn name(&self) -> &str;

    /// Append a document and return its assigned id.
    ///
    /// `data` is serialized to JSON text; the timestamp is assigned by the
    /// store at insert time, so `created_time` is non-decreasing with id.
    async fn insert(
        &self,
        doc_type: Option<&str>,
        identifier: Option<&str>,
        data: &serde_json::Value,
    ) -> std::result::Result<i64, StoreError>;

    /// Query documents, newest first.
    ///
    /// Matching is presence/absence of a payload substring and an optional
    /// exact `doc_type`, ties broken by recency — no ranking.
    async fn query(
        &self,
        filter: DocumentFilter,
    ) -> std::result::Result<Vec<Document>, StoreError>;

    /// Total number of stored documents.
    async fn count(&self) -> std::result::Result<u64, StoreError>;
}
