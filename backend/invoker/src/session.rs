//! One chat session and its request cycle.
//!
//! A cycle appends the human turn, calls the invoker with the prior-turn
//! window, then either commits the assistant reply or rolls the human turn
//! back so the history is exactly as it was before the input.

use tracing::{debug, info, warn};
use uuid::Uuid;

use groqchat_core::{ChatError, ChatSettings, History, Turn};

use crate::invoker::CompletionInvoker;

/// Result of submitting one line of input.
#[derive(Debug)]
pub enum CycleOutcome {
    /// Input was empty; nothing happened.
    Ignored,
    /// The reply was appended to the history.
    Committed(String),
    /// The request failed and the human turn was removed.
    RolledBack(ChatError),
}

/// Session-owned conversation state.
#[derive(Debug, Clone)]
pub struct ChatSession {
    id: Uuid,
    history: History,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::with_history(History::new())
    }

    pub fn with_history(history: History) -> Self {
        Self {
            id: Uuid::new_v4(),
            history,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// The turns to display for the given memory length.
    pub fn recent(&self, memory_length: usize) -> &[Turn] {
        self.history.last(memory_length)
    }

    /// Run one request cycle for `input`.
    pub async fn submit(
        &mut self,
        invoker: &CompletionInvoker,
        settings: &ChatSettings,
        input: &str,
    ) -> CycleOutcome {
        if input.trim().is_empty() {
            return CycleOutcome::Ignored;
        }

        // Window is taken before the new input joins the history.
        let context = self.history.last(settings.context_window()).to_vec();
        self.history.append(Turn::human(input));

        debug!(
            session = %self.id,
            context_turns = context.len(),
            history_len = self.history.len(),
            "Submitting turn"
        );

        match invoker.invoke(&context, input, settings.model()).await {
            Ok(reply) => {
                self.history.append(Turn::assistant(reply.clone()));
                info!(session = %self.id, history_len = self.history.len(), "Turn committed");
                CycleOutcome::Committed(reply)
            }
            Err(e) => {
                self.history.remove_last();
                warn!(session = %self.id, error = %e, "Turn rolled back");
                CycleOutcome::RolledBack(e)
            }
        }
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::providers::MockProvider;
    use groqchat_core::{ChatMessage, ModelChoice};

    fn invoker(provider: &Arc<MockProvider>) -> CompletionInvoker {
        CompletionInvoker::new(provider.clone())
    }

    fn session_with_turns(n: usize) -> ChatSession {
        let mut history = History::new();
        for i in 0..n {
            if i % 2 == 0 {
                history.append(Turn::human(format!("q{i}")));
            } else {
                history.append(Turn::assistant(format!("a{i}")));
            }
        }
        ChatSession::with_history(history)
    }

    #[tokio::test]
    async fn first_turn_commits_both_sides() {
        let provider = Arc::new(MockProvider::new("mock").with_response("Hi there"));
        let mut session = ChatSession::new();

        let outcome = session
            .submit(&invoker(&provider), &ChatSettings::default(), "Hello")
            .await;

        assert!(matches!(outcome, CycleOutcome::Committed(ref text) if text == "Hi there"));
        assert_eq!(
            session.history().turns(),
            &[Turn::human("Hello"), Turn::assistant("Hi there")]
        );
    }

    #[tokio::test]
    async fn success_extends_history_by_exactly_two() {
        let provider = Arc::new(MockProvider::new("mock").with_response("ok"));
        let mut session = session_with_turns(4);
        let before = session.history().clone();

        session
            .submit(&invoker(&provider), &ChatSettings::default(), "next")
            .await;

        let mut expected = before.turns().to_vec();
        expected.push(Turn::human("next"));
        expected.push(Turn::assistant("ok"));
        assert_eq!(session.history().turns(), expected.as_slice());
    }

    #[tokio::test]
    async fn failure_restores_history_exactly() {
        let provider = Arc::new(MockProvider::new("mock").failing("401 Unauthorized"));
        let mut session = session_with_turns(3);
        let before = session.history().clone();

        let outcome = session
            .submit(&invoker(&provider), &ChatSettings::default(), "Hello")
            .await;

        match outcome {
            CycleOutcome::RolledBack(e) => assert_eq!(e.to_string(), "401 Unauthorized"),
            other => panic!("expected rollback, got {other:?}"),
        }
        assert_eq!(session.history(), &before);
    }

    #[tokio::test]
    async fn failure_on_empty_history_leaves_it_empty() {
        let provider = Arc::new(MockProvider::new("mock").failing("boom"));
        let mut session = ChatSession::new();

        session
            .submit(&invoker(&provider), &ChatSettings::default(), "Hello")
            .await;

        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn context_is_last_window_of_prior_turns() {
        let provider = Arc::new(MockProvider::new("mock"));
        let mut session = session_with_turns(6);
        let settings = ChatSettings::new(ModelChoice::default(), 5, 5).unwrap();

        session.submit(&invoker(&provider), &settings, "new input").await;

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        let messages = &requests[0].messages;
        // 5 prior turns + the current input, not 6 + 1.
        assert_eq!(messages.len(), 6);
        assert_eq!(messages[0], ChatMessage::new("assistant", "a1"));
        assert_eq!(messages[4], ChatMessage::new("assistant", "a5"));
        assert_eq!(messages[5], ChatMessage::new("user", "new input"));
    }

    #[tokio::test]
    async fn model_selection_is_forwarded() {
        let provider = Arc::new(MockProvider::new("mock"));
        let mut session = ChatSession::new();
        let settings = ChatSettings::new(ModelChoice::Llama33_70bVersatile, 5, 5).unwrap();

        session.submit(&invoker(&provider), &settings, "hi").await;

        assert_eq!(provider.requests()[0].model, "llama-3.3-70b-versatile");
    }

    #[tokio::test]
    async fn empty_input_is_ignored() {
        let provider = Arc::new(MockProvider::new("mock"));
        let mut session = session_with_turns(2);

        let outcome = session
            .submit(&invoker(&provider), &ChatSettings::default(), "   \n")
            .await;

        assert!(matches!(outcome, CycleOutcome::Ignored));
        assert_eq!(session.history().len(), 2);
        assert!(provider.requests().is_empty());
    }

    #[test]
    fn recent_uses_memory_length() {
        let session = session_with_turns(7);
        let recent: Vec<_> = session.recent(3).iter().map(Turn::content).collect();
        assert_eq!(recent, vec!["q4", "a5", "q6"]);
    }
}
