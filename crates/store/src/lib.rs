//! SQLite document store.
//!
//! A single SQLite database file with one table, `documents`, holding the
//! append-only log: id, type tag, identifier, serialized JSON payload, and
//! insertion timestamp. Matching is plain `LIKE` substring search against
//! the stored payload — no full-text index, no ranking.

pub mod sqlite;

pub use sqlite::SqliteStore;
