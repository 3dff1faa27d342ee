//! Volatile per-session conversation state.
//!
//! Each session lives behind its own async mutex so a read-compose-update
//! cycle (which spans the gateway call) is serialized per key while distinct
//! sessions proceed independently. Nothing survives a process restart.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use miza_core::ids::SessionId;
use miza_core::turns::Turn;

/// History cap per session. Oldest turns are dropped first once exceeded.
pub const MAX_HISTORY_TURNS: usize = 20;

/// Conversation state for one session key.
#[derive(Clone, Debug)]
pub struct SessionState {
    pub history: Vec<Turn>,
    pub is_first: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
            is_first: true,
        }
    }

    /// Append a completed exchange (user turn, then model turn) and evict
    /// from the front past [`MAX_HISTORY_TURNS`].
    pub fn record_exchange(&mut self, user_text: impl Into<String>, model_text: impl Into<String>) {
        self.history.push(Turn::user(user_text));
        self.history.push(Turn::model(model_text));

        if self.history.len() > MAX_HISTORY_TURNS {
            let excess = self.history.len() - MAX_HISTORY_TURNS;
            self.history.drain(..excess);
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory map of session key to guarded state.
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<SessionId, Arc<Mutex<SessionState>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Existing state for the key, or a fresh `{history: [], is_first: true}`
    /// registered on first access.
    pub fn get_or_create(&self, session_id: &SessionId) -> Arc<Mutex<SessionState>> {
        self.sessions
            .entry(session_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(SessionState::new())))
            .clone()
    }

    /// Drop the session entirely. Returns whether it existed. The next
    /// access recreates fresh first-turn state.
    pub fn clear(&self, session_id: &SessionId) -> bool {
        self.sessions.remove(session_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
