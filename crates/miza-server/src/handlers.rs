//! HTTP handlers for the chat, clear, and liveness routes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use miza_core::ids::SessionId;
use miza_engine::fallback;

use crate::orchestrator::{ChatError, ChatOutcome};
use crate::server::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Missing prompt is treated the same as an empty one.
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub session_id: Option<SessionId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearRequest {
    #[serde(default)]
    pub session_id: Option<SessionId>,
}

/// `POST /api/chat`
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> (StatusCode, Json<Value>) {
    let session_id = req.session_id.unwrap_or_default();

    match state.orchestrator.handle(&req.prompt, session_id).await {
        Ok(ChatOutcome::Answered {
            reply,
            model,
            session_id,
            tokens,
        }) => (
            StatusCode::OK,
            Json(json!({
                "reply": reply,
                "model": model,
                "sessionId": session_id,
                "tokens": tokens,
            })),
        ),
        Ok(ChatOutcome::Fallback { reply, error }) => {
            let mut body = json!({
                "reply": reply,
                "model": fallback::BACKUP_MODEL_ID,
            });
            if let Some(error) = error {
                body["error"] = json!(error);
            }
            (StatusCode::OK, Json(body))
        }
        Err(ChatError::EmptyInput) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": ChatError::EmptyInput.to_string() })),
        ),
        Err(err) => {
            if let ChatError::MalformedResponse(detail) = &err {
                tracing::error!(detail = %detail, "gateway returned an unexpected response shape");
            } else {
                tracing::error!(error = %err, "chat request failed");
            }
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "reply": fallback::TECHNICAL_DIFFICULTIES,
                    "error": err.to_string(),
                })),
            )
        }
    }
}

/// `POST /api/clear`
pub async fn clear(State(state): State<AppState>, Json(req): Json<ClearRequest>) -> Json<Value> {
    let session_id = req.session_id.unwrap_or_default();
    let existed = state.orchestrator.clear(&session_id);

    tracing::info!(session_id = %session_id, existed, "session history cleared");

    Json(json!({
        "success": true,
        "message": "Historial limpiado",
        "sessionId": session_id,
    }))
}

/// `GET /api/test` — liveness probe.
pub async fn test(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "model": state.orchestrator.provider_model(),
        "message": "MIZA Backend funcionando",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
