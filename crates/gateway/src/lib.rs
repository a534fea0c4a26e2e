//! HTTP API gateway for Docstash.
//!
//! Exposes the record-keeping REST endpoints — student listing, record
//! creation, batch import, chat, and health — plus static file serving for
//! the frontend.
//!
//! Built on Axum. Every handler catches component errors at the boundary
//! and answers with a JSON envelope; a request fault never crashes the
//! process, and the chat route never surfaces a 5xx for an LLM failure.

use axum::extract::{DefaultBodyLimit, FromRequest, Multipart, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::{error, info, warn};

use docstash_agent::ChatOrchestrator;
use docstash_core::document::{Document, DocumentFilter};
use docstash_core::store::DocumentStore;
use docstash_import::{ImportDetail, ImportOutcome};

/// How many students the listing endpoint returns at most.
const STUDENTS_LIMIT: usize = 200;
/// Request body size limit (covers CSV uploads).
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Shared application state for the gateway.
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub orchestrator: Arc<ChatOrchestrator>,
}

pub type SharedState = Arc<AppState>;

/// Build the Axum router with all gateway routes.
///
/// Unmatched paths fall through to static file serving from `static_dir`.
pub fn build_router(state: SharedState, static_dir: &str) -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/students", get(students_handler))
        .route("/api/record", post(record_handler))
        .route("/api/import", post(import_handler))
        .route("/api/chat", post(chat_handler))
        .fallback_service(ServeDir::new(static_dir))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server.
pub async fn start(
    config: docstash_config::AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    if !config.has_api_key() {
        warn!("No LLM API key configured — /api/chat will return an error reply");
    }

    let store: Arc<dyn DocumentStore> =
        Arc::new(docstash_store::SqliteStore::new(&config.store.path).await?);
    let provider = Arc::new(docstash_llm::ChatClient::new(&config.llm));
    let orchestrator = Arc::new(ChatOrchestrator::new(store.clone(), provider));

    let state = Arc::new(AppState {
        store,
        orchestrator,
    });
    let app = build_router(state, &config.gateway.static_dir);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Request / Response types ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    time: String,
}

#[derive(Serialize)]
struct StudentsResponse {
    status: &'static str,
    students: Vec<Document>,
}

#[derive(Deserialize)]
struct RecordRequest {
    student_name: Option<String>,
    #[serde(default = "default_record_type")]
    record_type: String,
    content: Option<String>,
}

fn default_record_type() -> String {
    "record".into()
}

#[derive(Serialize)]
struct MessageResponse {
    status: &'static str,
    message: String,
}

#[derive(Serialize)]
struct ImportResponse {
    status: &'static str,
    summary: ImportSummary,
    details: Vec<ImportDetail>,
}

#[derive(Serialize)]
struct ImportSummary {
    success: usize,
    fail: usize,
}

impl ImportResponse {
    fn from_outcome(outcome: ImportOutcome) -> Self {
        Self {
            status: "success",
            summary: ImportSummary {
                success: outcome.success,
                fail: outcome.fail,
            },
            details: outcome.details,
        }
    }
}

#[derive(Deserialize)]
struct ChatRequest {
    #[serde(default)]
    message: String,
}

#[derive(Serialize)]
struct ChatResponse {
    status: &'static str,
    response: String,
}

/// The JSON error envelope every handler falls back to.
#[derive(Serialize)]
struct ErrorResponse {
    status: &'static str,
    message: String,
}

fn error_body(message: impl Into<String>) -> Json<ErrorResponse> {
    Json(ErrorResponse {
        status: "error",
        message: message.into(),
    })
}

// --- Handlers ---

/// Always ok with a fresh timestamp, independent of storage state.
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        time: chrono::Utc::now().to_rfc3339(),
    })
}

async fn students_handler(State(state): State<SharedState>) -> Response {
    let filter = DocumentFilter::recent()
        .with_doc_type("student")
        .with_limit(STUDENTS_LIMIT);

    match state.store.query(filter).await {
        Ok(students) => Json(StudentsResponse {
            status: "success",
            students,
        })
        .into_response(),
        Err(e) => {
            error!(error = %e, "Student listing failed");
            error_body("查询失败").into_response()
        }
    }
}

async fn record_handler(
    State(state): State<SharedState>,
    Json(payload): Json<RecordRequest>,
) -> Response {
    let record = serde_json::json!({
        "student_name": payload.student_name,
        "record_type": payload.record_type,
        "content": payload.content,
        "time": chrono::Utc::now().to_rfc3339(),
    });

    match state
        .store
        .insert(Some("record"), payload.student_name.as_deref(), &record)
        .await
    {
        Ok(_) => Json(MessageResponse {
            status: "success",
            message: "记录已添加".into(),
        })
        .into_response(),
        Err(e) => {
            error!(error = %e, "Record insert failed");
            error_body("添加失败").into_response()
        }
    }
}

/// Accepts either a JSON array body or a multipart upload with a CSV `file`
/// field. Anything else is a client error.
async fn import_handler(
    State(state): State<SharedState>,
    req: axum::extract::Request,
) -> Response {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    if content_type.starts_with("application/json") {
        let bytes = match axum::body::to_bytes(req.into_body(), MAX_BODY_BYTES).await {
            Ok(bytes) => bytes,
            Err(e) => {
                return (StatusCode::BAD_REQUEST, error_body(format!("无法读取请求体: {e}")))
                    .into_response();
            }
        };

        let value: serde_json::Value = match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(e) => {
                return (StatusCode::BAD_REQUEST, error_body(format!("JSON 解析失败: {e}")))
                    .into_response();
            }
        };

        let Some(items) = value.as_array() else {
            return (StatusCode::BAD_REQUEST, error_body("JSON 必须是数组")).into_response();
        };

        let outcome = docstash_import::import_json(state.store.as_ref(), items).await;
        return Json(ImportResponse::from_outcome(outcome)).into_response();
    }

    if content_type.starts_with("multipart/form-data") {
        let mut multipart = match Multipart::from_request(req, &()).await {
            Ok(multipart) => multipart,
            Err(e) => {
                return (StatusCode::BAD_REQUEST, error_body(format!("无效的上传: {e}")))
                    .into_response();
            }
        };

        while let Ok(Some(field)) = multipart.next_field().await {
            if field.name() != Some("file") {
                continue;
            }
            let bytes = match field.bytes().await {
                Ok(bytes) => bytes,
                Err(e) => {
                    return (StatusCode::BAD_REQUEST, error_body(format!("读取文件失败: {e}")))
                        .into_response();
                }
            };

            return match docstash_import::import_csv(state.store.as_ref(), &bytes).await {
                Ok(outcome) => Json(ImportResponse::from_outcome(outcome)).into_response(),
                Err(e) => (StatusCode::BAD_REQUEST, error_body(e.to_string())).into_response(),
            };
        }
    }

    (
        StatusCode::BAD_REQUEST,
        error_body("请上传 JSON 数组或 CSV 文件"),
    )
        .into_response()
}

/// Chat always answers HTTP 200 — LLM failures arrive as a readable reply
/// string inside the envelope, never as a server fault.
async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let response = state.orchestrator.handle(&payload.message).await;
    Json(ChatResponse {
        status: "success",
        response,
    })
}
