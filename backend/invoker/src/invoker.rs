use std::sync::Arc;

use tracing::{debug, info, warn};

use groqchat_core::{ChatError, ChatMessage, LlmProvider, LlmRequest, ModelChoice, Turn};

/// Turns a window of prior turns plus the current input into one
/// chat-completion call.
pub struct CompletionInvoker {
    provider: Arc<dyn LlmProvider>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

impl CompletionInvoker {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            max_tokens: None,
            temperature: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Map history turns to role-tagged messages, with `input` as the final user message.
    pub fn build_request(&self, history: &[Turn], input: &str, model: ModelChoice) -> LlmRequest {
        let mut messages: Vec<ChatMessage> = history
            .iter()
            .map(|turn| ChatMessage::new(turn.role().api_role(), turn.content()))
            .collect();
        messages.push(ChatMessage::new("user", input));

        LlmRequest {
            model: model.id().to_string(),
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    /// Run one completion. Every provider failure becomes `ChatError::Invocation`.
    pub async fn invoke(
        &self,
        history: &[Turn],
        input: &str,
        model: ModelChoice,
    ) -> Result<String, ChatError> {
        let request = self.build_request(history, input, model);
        let name = self.provider.name();

        debug!(provider = %name, model = %model, context_turns = history.len(), "Calling provider");

        match self.provider.complete(&request).await {
            Ok(response) => {
                info!(
                    provider = %name,
                    tokens = response.tokens_used,
                    latency_ms = response.latency_ms,
                    "Provider responded"
                );
                Ok(response.content)
            }
            Err(e) => {
                warn!(provider = %name, error = %e, "Provider failed");
                Err(ChatError::invocation(name, format!("{e:#}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MockProvider;

    #[test]
    fn build_request_appends_input_last() {
        let invoker = CompletionInvoker::new(Arc::new(MockProvider::new("mock")))
            .with_temperature(Some(0.2));
        let history = vec![Turn::human("What is Rust?"), Turn::assistant("A language.")];

        let request = invoker.build_request(&history, "Is it fast?", ModelChoice::Llama2_70b);

        assert_eq!(request.model, "llama2-70b-4096");
        assert_eq!(request.temperature, Some(0.2));
        assert_eq!(
            request.messages,
            vec![
                ChatMessage::new("user", "What is Rust?"),
                ChatMessage::new("assistant", "A language."),
                ChatMessage::new("user", "Is it fast?"),
            ]
        );
    }

    #[tokio::test]
    async fn invoke_returns_provider_text() {
        let invoker =
            CompletionInvoker::new(Arc::new(MockProvider::new("mock").with_response("Hi there")));
        let text = invoker.invoke(&[], "Hello", ModelChoice::default()).await.unwrap();
        assert_eq!(text, "Hi there");
    }

    #[tokio::test]
    async fn invoke_collapses_failures_into_invocation_error() {
        let invoker =
            CompletionInvoker::new(Arc::new(MockProvider::new("mock").failing("connection refused")));
        let err = invoker
            .invoke(&[], "Hello", ModelChoice::default())
            .await
            .unwrap_err();
        assert!(err.is_invocation());
        assert_eq!(err.to_string(), "connection refused");
    }
}
