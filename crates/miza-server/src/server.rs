use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::orchestrator::ChatOrchestrator;

/// Server configuration.
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 3001,
        }
    }
}

/// Shared application state passed to Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ChatOrchestrator>,
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(handlers::chat))
        .route("/api/clear", post(handlers::clear))
        .route("/api/test", get(handlers::test))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Create and start the server. Returns a handle that keeps it alive.
pub async fn start(
    config: ServerConfig,
    orchestrator: Arc<ChatOrchestrator>,
) -> Result<ServerHandle, std::io::Error> {
    let router = build_router(AppState { orchestrator });

    let addr = format!("{}:{}", config.bind, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(port = local_addr.port(), "MIZA server started");

    let server_task = tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    Ok(ServerHandle {
        port: local_addr.port(),
        _server: server_task,
    })
}

/// Handle returned by `start()` — keeps the serve task alive.
pub struct ServerHandle {
    pub port: u16,
    _server: tokio::task::JoinHandle<()>,
}

#[cfg(test)]
mod tests {
    use super::*;

    use miza_core::errors::GatewayError;
    use miza_engine::FallbackPicker;
    use miza_llm::{MockProvider, MockResponse};
    use miza_store::SessionStore;

    async fn start_with(responses: Vec<MockResponse>) -> ServerHandle {
        let provider = Arc::new(MockProvider::new(responses));
        let orchestrator = Arc::new(ChatOrchestrator::new(
            provider,
            Arc::new(SessionStore::new()),
            FallbackPicker::seeded(1),
        ));
        start(
            ServerConfig {
                bind: "127.0.0.1".to_string(),
                port: 0,
            },
            orchestrator,
        )
        .await
        .unwrap()
    }

    fn url(handle: &ServerHandle, path: &str) -> String {
        format!("http://127.0.0.1:{}{path}", handle.port)
    }

    #[tokio::test]
    async fn chat_round_trip() {
        let handle = start_with(vec![MockResponse::text_with_tokens("Hola, soy MIZA 🏔️", 12)]).await;

        let resp = reqwest::Client::new()
            .post(url(&handle, "/api/chat"))
            .json(&serde_json::json!({"prompt": "hola", "sessionId": "s1"}))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["reply"], "Hola, soy MIZA 🏔️");
        assert_eq!(body["model"], "mock-model");
        assert_eq!(body["sessionId"], "s1");
        assert_eq!(body["tokens"], 12);
    }

    #[tokio::test]
    async fn empty_prompt_is_a_400() {
        let handle = start_with(vec![]).await;

        let resp = reqwest::Client::new()
            .post(url(&handle, "/api/chat"))
            .json(&serde_json::json!({"prompt": "   ", "sessionId": "s1"}))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), 400);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["error"], "El mensaje no puede estar vacío");
    }

    #[tokio::test]
    async fn missing_prompt_field_is_a_400() {
        let handle = start_with(vec![]).await;

        let resp = reqwest::Client::new()
            .post(url(&handle, "/api/chat"))
            .json(&serde_json::json!({"sessionId": "s1"}))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), 400);
    }

    #[tokio::test]
    async fn upstream_failure_on_fresh_session_greets() {
        let handle = start_with(vec![MockResponse::Error(GatewayError::from_status(
            500,
            "internal".into(),
        ))])
        .await;

        let resp = reqwest::Client::new()
            .post(url(&handle, "/api/chat"))
            .json(&serde_json::json!({"prompt": "hola"}))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(
            body["reply"],
            "¡Hola! Soy MIZA 🏔️, tu asistente de turismo en Manizales. ¿En qué puedo ayudarte?"
        );
        assert_eq!(body["model"], "backup-system");
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn malformed_upstream_reply_is_a_500_with_apology() {
        let handle = start_with(vec![MockResponse::Error(GatewayError::MalformedResponse(
            "no candidates".into(),
        ))])
        .await;

        let resp = reqwest::Client::new()
            .post(url(&handle, "/api/chat"))
            .json(&serde_json::json!({"prompt": "hola"}))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), 500);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(
            body["reply"],
            "Lo siento, estoy teniendo problemas técnicos. Intenta de nuevo pronto."
        );
        assert_eq!(body["error"], "Estructura de respuesta inválida");
    }

    #[tokio::test]
    async fn clear_always_succeeds() {
        let handle = start_with(vec![]).await;

        let resp = reqwest::Client::new()
            .post(url(&handle, "/api/clear"))
            .json(&serde_json::json!({"sessionId": "nunca-visto"}))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Historial limpiado");
        assert_eq!(body["sessionId"], "nunca-visto");
    }

    #[tokio::test]
    async fn clear_defaults_the_session_id() {
        let handle = start_with(vec![]).await;

        let resp = reqwest::Client::new()
            .post(url(&handle, "/api/clear"))
            .json(&serde_json::json!({}))
            .send()
            .await
            .unwrap();

        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["sessionId"], "default");
    }

    #[tokio::test]
    async fn test_route_reports_liveness() {
        let handle = start_with(vec![]).await;

        let resp = reqwest::get(url(&handle, "/api/test")).await.unwrap();
        assert_eq!(resp.status(), 200);

        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["model"], "mock-model");
        assert_eq!(body["message"], "MIZA Backend funcionando");
        assert!(body["timestamp"].as_str().unwrap().contains('T'));
    }
}
