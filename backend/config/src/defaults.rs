//! Config defaults: fills unset values after loading.

use crate::schema::{ChatConfig, GroqChatConfig, LoggingConfig, ProviderConfig};
use groqchat_core::types::DEFAULT_WINDOW;
use groqchat_core::ModelChoice;

/// Groq's OpenAI-compatible endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Console/file log level when neither config nor `RUST_LOG` sets one.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: GroqChatConfig) -> GroqChatConfig {
    let config = apply_provider_defaults(config);
    let config = apply_chat_defaults(config);
    apply_logging_defaults(config)
}

fn apply_provider_defaults(mut config: GroqChatConfig) -> GroqChatConfig {
    let provider = config.provider.get_or_insert_with(ProviderConfig::default);
    if provider.base_url.is_none() {
        provider.base_url = Some(DEFAULT_BASE_URL.to_string());
    }
    if provider.timeout_secs.is_none() {
        provider.timeout_secs = Some(DEFAULT_TIMEOUT_SECS);
    }
    config
}

fn apply_chat_defaults(mut config: GroqChatConfig) -> GroqChatConfig {
    let chat = config.chat.get_or_insert_with(ChatConfig::default);
    if chat.model.is_none() {
        chat.model = Some(ModelChoice::default().id().to_string());
    }
    if chat.memory_length.is_none() {
        chat.memory_length = Some(DEFAULT_WINDOW);
    }
    if chat.context_window.is_none() {
        chat.context_window = Some(DEFAULT_WINDOW);
    }
    config
}

fn apply_logging_defaults(mut config: GroqChatConfig) -> GroqChatConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_empty_config() {
        let cfg = apply_all_defaults(GroqChatConfig::default());
        let provider = cfg.provider.unwrap();
        assert_eq!(provider.base_url.as_deref(), Some(DEFAULT_BASE_URL));
        assert_eq!(provider.timeout_secs, Some(60));
        let chat = cfg.chat.unwrap();
        assert_eq!(chat.model.as_deref(), Some("mixtral-8x7b-32768"));
        assert_eq!(chat.memory_length, Some(5));
        assert_eq!(cfg.logging.unwrap().level.as_deref(), Some("warn"));
    }

    #[test]
    fn does_not_override_user_values() {
        let cfg = GroqChatConfig {
            chat: Some(ChatConfig {
                memory_length: Some(2),
                ..Default::default()
            }),
            ..Default::default()
        };
        let cfg = apply_all_defaults(cfg);
        assert_eq!(cfg.chat.unwrap().memory_length, Some(2));
    }
}
