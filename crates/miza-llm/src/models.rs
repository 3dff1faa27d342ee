//! Wire shapes for the Gemini `generateContent` endpoint.

use serde::{Deserialize, Serialize};

use miza_core::provider::{GenerateOptions, GenerateRequest};

/// Model id used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    /// The whole composed message travels as one `user` turn — history is
    /// already rendered into the text, not sent as separate turns.
    pub fn single_user_turn(request: &GenerateRequest) -> Self {
        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: request.message.clone(),
                }],
            }],
            generation_config: request.options.into(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub max_output_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
}

impl From<GenerateOptions> for GenerationConfig {
    fn from(opts: GenerateOptions) -> Self {
        Self {
            max_output_tokens: opts.max_output_tokens,
            temperature: opts.temperature,
            top_p: opts.top_p,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub total_token_count: u64,
}

impl GenerateContentResponse {
    /// The expected reply path: first candidate, first part. Empty text is
    /// treated as missing.
    pub fn reply_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()
            .map(|p| p.text.as_str())
            .filter(|t| !t.is_empty())
    }

    pub fn total_tokens(&self) -> u64 {
        self.usage_metadata
            .as_ref()
            .map(|u| u.total_token_count)
            .unwrap_or(0)
    }
}

#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}

/// Pull the upstream error message out of a JSON error body, falling back to
/// the raw body when it is not the documented shape.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}
