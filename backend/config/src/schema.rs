//! groqchat configuration schema.
//!
//! Every field is optional in the file; [`crate::defaults`] fills the gaps
//! and the accessors below resolve the effective values.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use groqchat_core::{ChatSettings, SettingsError};

/// Environment variable consulted when no API key is configured.
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroqChatConfig {
    /// Upstream API connection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderConfig>,

    /// Model and window selection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat: Option<ChatConfig>,

    /// Logging configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_window: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

impl GroqChatConfig {
    /// Build chat settings from the `chat` section, defaults for anything unset.
    pub fn chat_settings(&self) -> Result<ChatSettings, SettingsError> {
        let defaults = ChatSettings::default();
        let chat = self.chat.clone().unwrap_or_default();
        let model = match chat.model {
            Some(id) => id.parse()?,
            None => defaults.model(),
        };
        ChatSettings::new(
            model,
            chat.memory_length.unwrap_or(defaults.memory_length()),
            chat.context_window.unwrap_or(defaults.context_window()),
        )
    }

    /// The configured key, else `GROQ_API_KEY` from the environment.
    pub fn api_key(&self) -> Option<String> {
        self.provider
            .as_ref()
            .and_then(|p| p.api_key.clone())
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty()))
    }

    pub fn base_url(&self) -> Option<&str> {
        self.provider.as_ref().and_then(|p| p.base_url.as_deref())
    }

    pub fn timeout(&self) -> Duration {
        let secs = self
            .provider
            .as_ref()
            .and_then(|p| p.timeout_secs)
            .unwrap_or(crate::defaults::DEFAULT_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    pub fn temperature(&self) -> Option<f32> {
        self.provider.as_ref().and_then(|p| p.temperature)
    }

    pub fn max_tokens(&self) -> Option<u32> {
        self.provider.as_ref().and_then(|p| p.max_tokens)
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(crate::defaults::DEFAULT_LOG_LEVEL)
    }

    /// Log directory; relative paths are resolved against `config_dir`.
    pub fn log_dir(&self, config_dir: &Path) -> PathBuf {
        match self.logging.as_ref().and_then(|l| l.dir.as_deref()) {
            Some(dir) if Path::new(dir).is_absolute() => PathBuf::from(dir),
            Some(dir) => config_dir.join(dir),
            None => config_dir.join("logs"),
        }
    }
}
