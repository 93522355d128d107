//! Config validation: schema checks with user-friendly error messages.

use crate::schema::GroqChatConfig;
use groqchat_core::types::WINDOW_RANGE;
use groqchat_core::ModelChoice;
use thiserror::Error;

const KNOWN_LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &GroqChatConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_provider(config, &mut report);
    validate_chat(config, &mut report);
    validate_logging(config, &mut report);
    report
}

fn validate_provider(config: &GroqChatConfig, report: &mut ValidationReport) {
    let Some(provider) = &config.provider else { return };

    if let Some(url) = &provider.base_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            report.error("provider.baseUrl", format!("'{url}' must start with http:// or https://"));
        }
    }
    if provider.timeout_secs == Some(0) {
        report.error("provider.timeoutSecs", "timeoutSecs must be >= 1");
    }
    if let Some(t) = provider.temperature {
        if !(0.0..=2.0).contains(&t) {
            report.error("provider.temperature", format!("temperature must be within 0.0..=2.0, got {t}"));
        }
    }
    if provider.max_tokens == Some(0) {
        report.error("provider.maxTokens", "maxTokens must be >= 1");
    }
    if provider.api_key.as_deref().map(|k| k.trim().is_empty()).unwrap_or(false) {
        report.warn("provider.apiKey", "apiKey is empty; GROQ_API_KEY will be used instead");
    }
}

fn validate_chat(config: &GroqChatConfig, report: &mut ValidationReport) {
    let Some(chat) = &config.chat else { return };

    if let Some(model) = &chat.model {
        if model.parse::<ModelChoice>().is_err() {
            let known: Vec<_> = ModelChoice::ALL.iter().map(|m| m.id()).collect();
            report.error(
                "chat.model",
                format!("Unknown model '{model}'. Use one of: {}", known.join(", ")),
            );
        }
    }
    for (path, value) in [
        ("chat.memoryLength", chat.memory_length),
        ("chat.contextWindow", chat.context_window),
    ] {
        if let Some(n) = value {
            if !WINDOW_RANGE.contains(&n) {
                report.error(
                    path,
                    format!(
                        "must be between {} and {}, got {n}",
                        WINDOW_RANGE.start(),
                        WINDOW_RANGE.end()
                    ),
                );
            }
        }
    }
}

fn validate_logging(config: &GroqChatConfig, report: &mut ValidationReport) {
    let Some(logging) = &config.logging else { return };
    if let Some(level) = &logging.level {
        // Anything else is passed to EnvFilter as a directive string.
        if !KNOWN_LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) && !level.contains('=') {
            report.warn("logging.level", format!("Unrecognised log level '{level}'"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::apply_all_defaults;
    use crate::schema::{ChatConfig, LoggingConfig, ProviderConfig};

    #[test]
    fn defaulted_config_is_valid() {
        let report = validate(&apply_all_defaults(GroqChatConfig::default()));
        assert!(report.is_valid(), "errors: {:?}", report.errors);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn unknown_model_is_error() {
        let cfg = GroqChatConfig {
            chat: Some(ChatConfig {
                model: Some("gpt-4o".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let report = validate(&cfg);
        assert!(!report.is_valid());
        assert_eq!(report.errors[0].path, "chat.model");
    }

    #[test]
    fn window_out_of_range_is_error() {
        let cfg = GroqChatConfig {
            chat: Some(ChatConfig {
                memory_length: Some(11),
                context_window: Some(0),
                ..Default::default()
            }),
            ..Default::default()
        };
        let report = validate(&cfg);
        assert_eq!(report.errors.len(), 2);
    }

    #[test]
    fn bad_provider_values_are_errors() {
        let cfg = GroqChatConfig {
            provider: Some(ProviderConfig {
                base_url: Some("api.groq.com".into()),
                timeout_secs: Some(0),
                temperature: Some(3.5),
                ..Default::default()
            }),
            ..Default::default()
        };
        let report = validate(&cfg);
        assert_eq!(report.errors.len(), 3);
    }

    #[test]
    fn odd_log_level_is_only_a_warning() {
        let cfg = GroqChatConfig {
            logging: Some(LoggingConfig {
                level: Some("loud".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let report = validate(&cfg);
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
    }
}
