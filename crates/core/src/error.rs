//! Error types for the Docstash domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum.

use thiserror::Error;

/// The top-level error type for all Docstash operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Persistence errors ---
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    // --- Import errors ---
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    // --- LLM client errors ---
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// A storage operation failed. Callers treat these as non-fatal: batch
/// operations tally them, and the chat path ignores insert failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),
}

/// The import payload itself was unusable. Surfaced to HTTP clients as 400;
/// per-item failures inside a valid batch are tallied instead.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Invalid import input: {0}")]
    InvalidInput(String),
}

/// The external completion API failed. Never propagated to end users —
/// the orchestrator converts these into a fixed human-readable reply.
#[derive(Debug, Clone, Error)]
pub enum LlmError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected response shape: {0}")]
    UnexpectedResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_displays_correctly() {
        let err = Error::Store(StoreError::Storage("disk full".into()));
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn llm_error_displays_correctly() {
        let err = Error::Llm(LlmError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn import_error_displays_correctly() {
        let err = ImportError::InvalidInput("expected a JSON array or a CSV file".into());
        assert!(err.to_string().contains("JSON array"));
    }
}
