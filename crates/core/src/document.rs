//! The document model — a flat, append-only log of JSON payloads.
//!
//! Every stored record is a [`Document`]: an opaque JSON value with an
//! optional type tag and identifier. No schema is enforced across documents
//! of the same `doc_type`, and no relationships between documents exist.
//! Documents are never mutated or deleted once inserted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single stored document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Auto-assigned row id — unique and strictly increasing.
    pub id: i64,

    /// Free-text category tag (e.g., "student", "record").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,

    /// Free-text identifier, usually a person's name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,

    /// The JSON payload. If the stored text fails to parse back, the store
    /// returns it as a JSON string instead of erroring.
    pub data: serde_json::Value,

    /// When this document was inserted. Non-decreasing with `id`.
    pub created_time: DateTime<Utc>,
}

/// Filter for querying documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentFilter {
    /// Substring match against the serialized JSON payload.
    #[serde(default)]
    pub search_text: Option<String>,

    /// Exact match on the document type tag.
    #[serde(default)]
    pub doc_type: Option<String>,

    /// Maximum number of results, newest first.
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

impl Default for DocumentFilter {
    fn default() -> Self {
        Self {
            search_text: None,
            doc_type: None,
            limit: default_limit(),
        }
    }
}

impl DocumentFilter {
    /// A filter returning the most recent documents, up to the default limit.
    pub fn recent() -> Self {
        Self::default()
    }

    /// Filter by substring match against the serialized payload.
    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    /// Filter by exact document type.
    pub fn with_doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self
    }

    /// Bound the number of results.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}
