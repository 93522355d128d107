use thiserror::Error;

/// Top-level error type for groqchat.
///
/// Everything that goes wrong while talking to the model collapses into
/// [`ChatError::Invocation`]; the only start-up failure is a missing key.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{message}")]
    Invocation { provider: String, message: String },

    #[error("missing API key: set {0}")]
    MissingApiKey(String),
}

impl ChatError {
    pub fn invocation(provider: impl Into<String>, message: impl Into<String>) -> Self {
        ChatError::Invocation {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// True for the single user-facing failure category of a request cycle.
    pub fn is_invocation(&self) -> bool {
        matches!(self, ChatError::Invocation { .. })
    }
}
