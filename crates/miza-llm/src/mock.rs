use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use miza_core::errors::GatewayError;
use miza_core::provider::{GenerateRequest, LlmProvider, ModelReply};

/// Pre-programmed responses for deterministic testing without API calls.
pub enum MockResponse {
    /// Return a reply.
    Reply(ModelReply),
    /// Fail with the given gateway error.
    Error(GatewayError),
    /// Wait a duration, then yield the inner response.
    Delay(Duration, Box<MockResponse>),
}

impl MockResponse {
    /// Convenience: a plain text reply with no usage metadata.
    pub fn text(text: &str) -> Self {
        Self::Reply(ModelReply {
            text: text.to_string(),
            total_tokens: 0,
        })
    }

    pub fn text_with_tokens(text: &str, total_tokens: u64) -> Self {
        Self::Reply(ModelReply {
            text: text.to_string(),
            total_tokens,
        })
    }

    pub fn delayed(delay: Duration, inner: MockResponse) -> Self {
        Self::Delay(delay, Box::new(inner))
    }
}

/// Mock provider that consumes pre-programmed responses in sequence and
/// records every composed message it was asked to send.
pub struct MockProvider {
    responses: Mutex<VecDeque<MockResponse>>,
    sent_messages: Mutex<Vec<String>>,
}

impl MockProvider {
    pub fn new(responses: Vec<MockResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            sent_messages: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.sent_messages.lock().len()
    }

    /// Composed messages captured from each `generate` call, in order.
    pub fn sent_messages(&self) -> Vec<String> {
        self.sent_messages.lock().clone()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<ModelReply, GatewayError> {
        self.sent_messages.lock().push(request.message.clone());

        let Some(response) = self.responses.lock().pop_front() else {
            return Err(GatewayError::InvalidRequest(
                "MockProvider: no response configured for this call".to_string(),
            ));
        };

        // Unroll nested delays iteratively to avoid recursive async.
        let mut current = response;
        loop {
            match current {
                MockResponse::Reply(reply) => return Ok(reply),
                MockResponse::Error(e) => return Err(e),
                MockResponse::Delay(duration, inner) => {
                    tokio::time::sleep(duration).await;
                    current = *inner;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn text_response() {
        let mock = MockProvider::new(vec![MockResponse::text("hola")]);
        let reply = mock.generate(&GenerateRequest::new("hi")).await.unwrap();
        assert_eq!(reply.text, "hola");
        assert_eq!(reply.total_tokens, 0);
    }

    #[tokio::test]
    async fn error_response() {
        let mock = MockProvider::new(vec![MockResponse::Error(GatewayError::from_status(
            500,
            "boom".into(),
        ))]);
        let result = mock.generate(&GenerateRequest::new("hi")).await;
        assert!(matches!(result, Err(GatewayError::ServerError { status: 500, .. })));
    }

    #[tokio::test]
    async fn sequential_responses_and_capture() {
        let mock = MockProvider::new(vec![
            MockResponse::text("first"),
            MockResponse::text_with_tokens("second", 9),
        ]);

        let r1 = mock.generate(&GenerateRequest::new("uno")).await.unwrap();
        let r2 = mock.generate(&GenerateRequest::new("dos")).await.unwrap();

        assert_eq!(r1.text, "first");
        assert_eq!(r2.total_tokens, 9);
        assert_eq!(mock.call_count(), 2);
        assert_eq!(mock.sent_messages(), vec!["uno", "dos"]);
    }

    #[tokio::test]
    async fn exhausted_responses() {
        let mock = MockProvider::new(vec![MockResponse::text("only one")]);
        let _ = mock.generate(&GenerateRequest::new("a")).await;
        let result = mock.generate(&GenerateRequest::new("b")).await;
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn delayed_response() {
        let mock = MockProvider::new(vec![MockResponse::delayed(
            Duration::from_millis(50),
            MockResponse::text("after delay"),
        )]);

        let start = std::time::Instant::now();
        let reply = mock.generate(&GenerateRequest::new("hi")).await.unwrap();
        let elapsed = start.elapsed();

        assert!(
            elapsed >= Duration::from_millis(40),
            "Delay should have waited ~50ms, got {:?}",
            elapsed
        );
        assert_eq!(reply.text, "after delay");
    }

    #[test]
    fn provider_properties() {
        let mock = MockProvider::new(vec![]);
        assert_eq!(mock.name(), "mock");
        assert_eq!(mock.model(), "mock-model");
    }
}
