use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use groqchat_core::{LlmProvider, LlmRequest, LlmResponse};

enum MockReply {
    Fixed(String),
    Echo,
    Fail(String),
}

/// An LLM provider that returns canned responses and records every request.
pub struct MockProvider {
    name: String,
    reply: MockReply,
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reply: MockReply::Fixed("Mock response".to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.reply = MockReply::Fixed(response.into());
        self
    }

    /// Reply with the last message of each request.
    pub fn echo(mut self) -> Self {
        self.reply = MockReply::Echo;
        self
    }

    /// Fail every request with the given message.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.reply = MockReply::Fail(message.into());
        self
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.clone());

        let content = match &self.reply {
            MockReply::Fixed(text) => text.clone(),
            MockReply::Echo => {
                let last = request
                    .messages
                    .last()
                    .map(|m| m.content.as_str())
                    .unwrap_or_default();
                format!("You said: {last}")
            }
            MockReply::Fail(message) => anyhow::bail!("{message}"),
        };

        Ok(LlmResponse {
            content,
            provider: self.name.clone(),
            model: request.model.clone(),
            tokens_used: 0,
            latency_ms: 0,
        })
    }
}
