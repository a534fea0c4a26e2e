//! Chat orchestration: classify, look up or store, then ask the LLM.
//!
//! The orchestrator never fails a request: store faults on the write path
//! are logged and ignored (fire-and-forget), and provider faults become a
//! fixed human-readable reply.

use crate::classifier::{self, Intent};
use chrono::Utc;
use docstash_core::document::DocumentFilter;
use docstash_core::provider::CompletionProvider;
use docstash_core::store::DocumentStore;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

/// How many documents a chat lookup injects as context.
const CHAT_QUERY_LIMIT: usize = 20;

/// Drives a single chat turn end to end.
pub struct ChatOrchestrator {
    store: Arc<dyn DocumentStore>,
    provider: Arc<dyn CompletionProvider>,
}

impl ChatOrchestrator {
    pub fn new(store: Arc<dyn DocumentStore>, provider: Arc<dyn CompletionProvider>) -> Self {
        Self { store, provider }
    }

    /// Handle a user message and return the reply text.
    ///
    /// All failure modes end in a readable string; this function does not
    /// return errors.
    pub async fn handle(&self, message: &str) -> String {
        let intent = classifier::classify(message);
        let name = classifier::extract_name(message);
        debug!(?intent, name = name.as_deref(), "Chat message classified");

        let context = match intent {
            Intent::Query => self.lookup_context(name.as_deref()).await,
            Intent::Store => self.store_record(message, name.as_deref()).await,
        };

        let system_prompt = build_system_prompt(&context, intent);

        match self.provider.complete(&system_prompt, message).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "Completion API failed");
                format!("AI 服务错误：{e}")
            }
        }
    }

    /// Query documents matching the extracted name (or the most recent
    /// documents when no name was found).
    async fn lookup_context(&self, name: Option<&str>) -> serde_json::Value {
        let mut filter = DocumentFilter::recent().with_limit(CHAT_QUERY_LIMIT);
        if let Some(name) = name {
            filter = filter.with_search(name);
        }

        match self.store.query(filter).await {
            Ok(docs) => serde_json::to_value(docs).unwrap_or_else(|_| json!([])),
            Err(e) => {
                warn!(error = %e, "Chat lookup failed");
                json!([])
            }
        }
    }

    /// Build and insert a `record` document from the message.
    ///
    /// Insert failures are logged and ignored — the reply is generated from
    /// the in-memory record either way.
    async fn store_record(&self, message: &str, name: Option<&str>) -> serde_json::Value {
        let record = json!({
            "student_name": name,
            "content": message,
            "time": Utc::now().to_rfc3339(),
        });

        if let Err(e) = self.store.insert(Some("record"), name, &record).await {
            warn!(error = %e, "Chat record insert failed");
        }

        record
    }
}

/// Compose the system prompt: stored data as JSON context plus the intent
/// label.
fn build_system_prompt(context: &serde_json::Value, intent: Intent) -> String {
    let context_json =
        serde_json::to_string_pretty(context).unwrap_or_else(|_| "[]".to_string());

    format!(
        "你是一个信息系统 AI。以下是数据库返回的数据：\n\n\
         {context_json}\n\n\
         用户意图：{}\n\n\
         请生成自然、简洁、专业的回复。",
        intent.label()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use docstash_core::error::LlmError;
    use docstash_store::SqliteStore;
    use std::sync::Mutex;

    /// A stub provider that records the prompts it was given and returns a
    /// scripted result.
    struct StubProvider {
        reply: Result<String, LlmError>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl StubProvider {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing(err: LlmError) -> Self {
            Self {
                reply: Err(err),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn last_system_prompt(&self) -> String {
            self.calls.lock().unwrap().last().unwrap().0.clone()
        }
    }

    #[async_trait]
    impl CompletionProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        async fn complete(
            &self,
            system_prompt: &str,
            user_message: &str,
        ) -> Result<String, LlmError> {
            self.calls
                .lock()
                .unwrap()
                .push((system_prompt.to_string(), user_message.to_string()));
            self.reply.clone()
        }
    }

    async fn test_store() -> Arc<SqliteStore> {
        Arc::new(SqliteStore::new("sqlite::memory:").await.unwrap())
    }

    #[tokio::test]
    async fn query_intent_injects_matching_documents() {
        let store = test_store().await;
        store
            .insert(Some("record"), Some("张三"), &json!({"content": "张三 期中 90 分"}))
            .await
            .unwrap();
        store
            .insert(Some("record"), Some("李四"), &json!({"content": "李四 迟到"}))
            .await
            .unwrap();

        let provider = Arc::new(StubProvider::replying("好的"));
        let orchestrator = ChatOrchestrator::new(store, provider.clone());

        let reply = orchestrator.handle("查询张三").await;
        assert_eq!(reply, "好的");

        let prompt = provider.last_system_prompt();
        assert!(prompt.contains("张三 期中 90 分"));
        assert!(!prompt.contains("李四"));
        assert!(prompt.contains("查询"));
    }

    #[tokio::test]
    async fn query_without_name_returns_recent_documents() {
        let store = test_store().await;
        store
            .insert(Some("record"), None, &json!({"content": "some note"}))
            .await
            .unwrap();

        let provider = Arc::new(StubProvider::replying("ok"));
        let orchestrator = ChatOrchestrator::new(store, provider.clone());

        orchestrator.handle("有哪些记录").await;
        assert!(provider.last_system_prompt().contains("some note"));
    }

    #[tokio::test]
    async fn store_intent_inserts_a_record() {
        let store = test_store().await;
        let provider = Arc::new(StubProvider::replying("已记录"));
        let orchestrator = ChatOrchestrator::new(store.clone(), provider.clone());

        let message = "帮我记录：张三今天迟到";
        let reply = orchestrator.handle(message).await;
        assert_eq!(reply, "已记录");

        let docs = store
            .query(DocumentFilter::recent().with_doc_type("record"))
            .await
            .unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].data["content"], message);
        assert!(docs[0].identifier.is_some());

        // The freshly built record is the prompt context.
        assert!(provider.last_system_prompt().contains(message));
    }

    #[tokio::test]
    async fn provider_failure_yields_fixed_error_string() {
        let store = test_store().await;
        let provider = Arc::new(StubProvider::failing(LlmError::Network(
            "connection refused".into(),
        )));
        let orchestrator = ChatOrchestrator::new(store, provider);

        let reply = orchestrator.handle("查询张三").await;
        assert!(reply.starts_with("AI 服务错误："));
        assert!(reply.contains("connection refused"));
    }

    #[tokio::test]
    async fn unclassified_message_defaults_to_query() {
        let store = test_store().await;
        let provider = Arc::new(StubProvider::replying("hi"));
        let orchestrator = ChatOrchestrator::new(store.clone(), provider.clone());

        orchestrator.handle("你好").await;

        // Default intent is a lookup — nothing was inserted.
        assert_eq!(store.count().await.unwrap(), 0);
        assert!(provider.last_system_prompt().contains("查询"));
    }
}
