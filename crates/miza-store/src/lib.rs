pub mod sessions;

pub use sessions::{SessionState, SessionStore, MAX_HISTORY_TURNS};
