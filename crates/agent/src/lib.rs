//! Intent classification and chat orchestration.
//!
//! The classifier is a fixed keyword-priority table over the user's message;
//! the orchestrator turns the classified message into a store lookup or a
//! new record, then asks the external LLM to phrase the reply with that
//! result injected as context.

pub mod classifier;
pub mod orchestrator;

pub use classifier::{Intent, classify, extract_name};
pub use orchestrator::ChatOrchestrator;
