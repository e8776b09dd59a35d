use std::sync::Arc;

use askdocs::{
    parse_and_replace_references, unique_hits, ConversationBackend, ErrorResponse,
};
use axum::{
    extract::State,
    http::{Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};

use crate::ask_payload::AskPayload;
use crate::ask_response::AskResponse;

pub struct AppState<B> {
    pub backend: Arc<B>,
}

impl<B> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
        }
    }
}

pub fn router<B>(backend: B) -> Router
where
    B: ConversationBackend + Send + Sync + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/ask", post(ask::<B>))
        .layer(cors)
        .with_state(AppState {
            backend: Arc::new(backend),
        })
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn error(status: StatusCode, message: String) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            status: "error".to_string(),
            error: message,
        }),
    )
}

async fn ask<B>(
    State(state): State<AppState<B>>,
    Json(payload): Json<AskPayload>,
) -> Result<Json<AskResponse>, (StatusCode, Json<ErrorResponse>)>
where
    B: ConversationBackend + Send + Sync + 'static,
{
    let message = payload.message.trim();
    if message.is_empty() {
        return Err(error(StatusCode::BAD_REQUEST, "message is required".to_string()));
    }

    let result = state
        .backend
        .multi_search(message, payload.conversation_id.as_deref())
        .await
        .map_err(|e| {
            log::error!("Ask failed: {}", e);
            error(StatusCode::BAD_GATEWAY, e.to_string())
        })?;

    let answer_html = parse_and_replace_references(&result.answer, &result.hits).into_owned();

    Ok(Json(AskResponse {
        answer_html,
        hits: unique_hits(&result.hits),
        answer: result.answer,
        conversation_id: result.conversation_id,
        found: result.found,
        out_of: result.out_of,
        search_time_ms: result.search_time_ms,
    }))
}
