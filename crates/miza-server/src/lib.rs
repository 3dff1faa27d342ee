pub mod handlers;
pub mod orchestrator;
pub mod server;

pub use orchestrator::{ChatError, ChatOrchestrator, ChatOutcome};
pub use server::{build_router, start, AppState, ServerConfig, ServerHandle};
