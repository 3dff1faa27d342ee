use async_trait::async_trait;

use crate::errors::GatewayError;

/// Fixed generation parameters sent with every upstream request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GenerateOptions {
    pub max_output_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            max_output_tokens: 250,
            temperature: 0.7,
            top_p: 0.8,
        }
    }
}

/// A fully-composed message ready to be sent as a single user turn.
#[derive(Clone, Debug)]
pub struct GenerateRequest {
    pub message: String,
    pub options: GenerateOptions,
}

impl GenerateRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            options: GenerateOptions::default(),
        }
    }
}

/// Reply text plus whatever usage accounting the upstream reported.
#[derive(Clone, Debug)]
pub struct ModelReply {
    pub text: String,
    /// Zero when the upstream omits usage metadata.
    pub total_tokens: u64,
}

/// Trait implemented by each hosted-model backend (Gemini in production,
/// a mock in tests).
#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn name(&self) -> &str;
    fn model(&self) -> &str;

    async fn generate(&self, request: &GenerateRequest) -> Result<ModelReply, GatewayError>;
}
