//! # Docstash Core
//!
//! Domain types, traits, and error definitions for the Docstash record
//! backend. This crate has **zero framework dependencies** — it defines the
//! domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The two seams of the system are defined as traits here: [`DocumentStore`]
//! (persistence) and [`CompletionProvider`] (the external LLM). The SQLite
//! and HTTP implementations live in their own crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod document;
pub mod error;
pub mod provider;
pub mod store;

// Re-export key types at crate root for ergonomics
pub use document::{Document, DocumentFilter};
pub use error::{Error, ImportError, LlmError, Result, StoreError};
pub use provider::CompletionProvider;
pub use store::DocumentStore;
