//! OpenAI-compatible chat completion client.
//!
//! One operation: send a fixed two-message exchange (system + user) to the
//! configured `/chat/completions` endpoint and return the reply text. Any
//! network fault or non-2xx response is captured as an [`LlmError`] rather
//! than raised — the orchestrator turns those into a human-readable reply.

use async_trait::async_trait;
use docstash_config::LlmConfig;
use docstash_core::error::LlmError;
use docstash_core::provider::CompletionProvider;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A chat completion client for any OpenAI-compatible endpoint
/// (DeepSeek, OpenAI, vLLM, Ollama, ...).
pub struct ChatClient {
    base_url: String,
    api_key: Option<String>,
    model: String,
    client: reqwest::Client,
}

impl ChatClient {
    /// Create a new client from configuration.
    pub fn new(config: &LlmConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            client,
        }
    }

    /// Convert a system/user pair to the wire message list.
    fn to_api_messages(system_prompt: &str, user_message: &str) -> Vec<ApiMessage> {
        vec![
            ApiMessage {
                role: "system".into(),
                content: system_prompt.to_string(),
            },
            ApiMessage {
                role: "user".into(),
                content: user_message.to_string(),
            },
        ]
    }
}

#[async_trait]
impl CompletionProvider for ChatClient {
    fn name(&self) -> &str {
        "openai-compat"
    }

    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, LlmError> {
        let Some(ref api_key) = self.api_key else {
            return Err(LlmError::AuthenticationFailed(
                "No API key configured — set DOCSTASH_API_KEY or llm.api_key".into(),
            ));
        };

        let url = format!("{}/chat/completions", self.base_url);
        let body = ApiRequest {
            model: self.model.clone(),
            messages: Self::to_api_messages(system_prompt, user_message),
            stream: false,
        };

        debug!(model = %self.model, "Sending completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 401 || status == 403 {
            return Err(LlmError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if !(200..300).contains(&status) {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Completion API returned error");
            return Err(LlmError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::UnexpectedResponse(format!("Failed to parse response: {e}")))?;

        let reply = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::UnexpectedResponse("No choices in response".into()))?;

        Ok(reply)
    }
}

// --- Wire types (internal) ---

#[derive(Debug, Serialize)]
struct ApiRequest {
    model: String,
    messages: Vec<ApiMessage>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ApiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ApiResponseMessage {
    #[serde(default)]
    content: Option<String>,
}
