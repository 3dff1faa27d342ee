//! Conversation orchestrator — connects the rule engine, session store, and
//! model gateway into one chat exchange.
//!
//! The session mutex is held across the gateway call, so concurrent requests
//! for the same key are serialized and never lose an update; distinct
//! sessions proceed independently.

use std::sync::Arc;

use chrono::Timelike;

use miza_core::errors::GatewayError;
use miza_core::ids::SessionId;
use miza_core::provider::{GenerateRequest, LlmProvider};
use miza_engine::fallback::{self, FallbackPicker};
use miza_engine::{prompt, rules};
use miza_store::SessionStore;

/// Result of a chat exchange that produced a reply.
#[derive(Clone, Debug)]
pub enum ChatOutcome {
    /// The gateway answered; the exchange was recorded in history.
    Answered {
        reply: String,
        model: String,
        session_id: SessionId,
        tokens: u64,
    },
    /// The gateway failed; a locally-stored reply was produced instead and
    /// history was left untouched.
    Fallback {
        reply: String,
        error: Option<String>,
    },
}

/// Failures surfaced to the HTTP layer as error statuses.
#[derive(Clone, Debug, thiserror::Error)]
pub enum ChatError {
    #[error("El mensaje no puede estar vacío")]
    EmptyInput,
    #[error("Estructura de respuesta inválida")]
    MalformedResponse(String),
    #[error("{0}")]
    Unexpected(String),
}

pub struct ChatOrchestrator {
    provider: Arc<dyn LlmProvider>,
    store: Arc<SessionStore>,
    fallback: FallbackPicker,
}

impl ChatOrchestrator {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        store: Arc<SessionStore>,
        fallback: FallbackPicker,
    ) -> Self {
        Self {
            provider,
            store,
            fallback,
        }
    }

    pub fn provider_model(&self) -> &str {
        self.provider.model()
    }

    /// Handle one chat exchange at the current local hour.
    pub async fn handle(
        &self,
        prompt_text: &str,
        session_id: SessionId,
    ) -> Result<ChatOutcome, ChatError> {
        let now_hour = chrono::Local::now().hour();
        self.handle_at(prompt_text, session_id, now_hour).await
    }

    /// Same as [`handle`](Self::handle) with the wall-clock hour injected.
    pub async fn handle_at(
        &self,
        prompt_text: &str,
        session_id: SessionId,
        now_hour: u32,
    ) -> Result<ChatOutcome, ChatError> {
        if prompt_text.trim().is_empty() {
            return Err(ChatError::EmptyInput);
        }

        let annotation = rules::annotate(prompt_text, now_hour);
        let enriched = format!("{prompt_text} {annotation}");

        let state = self.store.get_or_create(&session_id);
        let mut state = state.lock().await;

        // First-turn status is consumed up front, before the gateway call:
        // a failed first call does not get the system prompt again.
        let first = state.is_first;
        let message = if first {
            state.is_first = false;
            prompt::first_turn(&enriched)
        } else {
            prompt::with_history(&state.history, &enriched)
        };

        tracing::debug!(
            session_id = %session_id,
            first,
            history_len = state.history.len(),
            "sending composed message to gateway"
        );

        match self.provider.generate(&GenerateRequest::new(message)).await {
            Ok(reply) => {
                state.record_exchange(enriched, reply.text.clone());
                Ok(ChatOutcome::Answered {
                    reply: reply.text,
                    model: self.provider.model().to_string(),
                    session_id,
                    tokens: reply.total_tokens,
                })
            }
            Err(err) if err.is_recoverable() => {
                tracing::warn!(
                    session_id = %session_id,
                    kind = err.error_kind(),
                    error = %err,
                    "gateway failed, answering from the backup list"
                );
                if state.history.is_empty() {
                    Ok(ChatOutcome::Fallback {
                        reply: fallback::GREETING_FALLBACK.to_string(),
                        error: None,
                    })
                } else {
                    Ok(ChatOutcome::Fallback {
                        reply: self.fallback.pick().to_string(),
                        error: Some(err.to_string()),
                    })
                }
            }
            Err(GatewayError::MalformedResponse(detail)) => {
                Err(ChatError::MalformedResponse(detail))
            }
            Err(err) => Err(ChatError::Unexpected(err.to_string())),
        }
    }

    /// Drop a session's state. Returns whether it existed.
    pub fn clear(&self, session_id: &SessionId) -> bool {
        self.store.clear(session_id)
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }
}
