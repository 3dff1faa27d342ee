use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use miza_core::errors::GatewayError;
use miza_core::provider::{GenerateRequest, LlmProvider, ModelReply};

use crate::models::{self, GenerateContentRequest, GenerateContentResponse};

const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Bound on the whole upstream round trip. The reference behavior had none;
/// an elapsed timeout is classified `GatewayError::Timeout`.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub struct GeminiProvider {
    client: Client,
    api_key: SecretString,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_key: SecretString, model: Option<&str>) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("failed to build HTTP client"),
            api_key,
            model: model.unwrap_or(models::DEFAULT_MODEL).to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{API_BASE_URL}/{}:generateContent", self.model)
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn generate(&self, request: &GenerateRequest) -> Result<ModelReply, GatewayError> {
        let body = GenerateContentRequest::single_user_turn(request);

        let resp = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.expose_secret())])
            .header("accept", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout(REQUEST_TIMEOUT)
                } else {
                    GatewayError::NetworkError(e.to_string())
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let raw = resp.text().await.unwrap_or_default();
            let message = models::error_message(&raw);
            tracing::warn!(status = status.as_u16(), error = %message, "Gemini request failed");
            return Err(GatewayError::from_status(status.as_u16(), message));
        }

        let parsed: GenerateContentResponse = resp
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

        let text = parsed
            .reply_text()
            .ok_or_else(|| GatewayError::MalformedResponse("missing candidate reply text".into()))?
            .to_string();

        Ok(ModelReply {
            text,
            total_tokens: parsed.total_tokens(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(model: Option<&str>) -> GeminiProvider {
        GeminiProvider::new(SecretString::from("test-key"), model)
    }

    #[test]
    fn provider_properties() {
        let p = provider(Some("gemini-2.0-flash"));
        assert_eq!(p.name(), "gemini");
        assert_eq!(p.model(), "gemini-2.0-flash");
    }

    #[test]
    fn default_model_used_when_none() {
        assert_eq!(provider(None).model(), models::DEFAULT_MODEL);
    }

    #[test]
    fn endpoint_embeds_model_id() {
        let p = provider(None);
        assert_eq!(
            p.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn endpoint_never_embeds_the_key() {
        // The key travels as a query parameter at send time, not in the URL
        // we format (and log).
        assert!(!provider(None).endpoint().contains("test-key"));
    }

    #[test]
    fn request_timeout_constant() {
        assert_eq!(REQUEST_TIMEOUT, Duration::from_secs(15));
    }
}
