//! `groqchat-config` — groqchat configuration management.
//!
//! Provides:
//! - Typed config schema (provider, chat, logging)
//! - YAML loading and `.env` support
//! - `${ENV_VAR}` substitution
//! - Default value application
//! - Schema validation

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use schema::{GroqChatConfig, API_KEY_ENV};
pub use io::{config_dir, config_file_path, load_config, load_dotenv};
pub use env::{resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use defaults::apply_all_defaults;
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::path::Path;

/// Load, apply env substitution, apply defaults to, and validate a config file.
///
/// This is the main entry point for loading a config at runtime. Validation
/// errors abort; warnings are returned so the caller can log them once its
/// logger is installed.
pub async fn load_and_prepare(path: &Path) -> Result<(GroqChatConfig, Vec<ConfigValidationError>)> {
    let raw_config = load_config(path).await?;

    let value: Value = serde_json::to_value(&raw_config)
        .context("Failed to serialize config for processing")?;

    let value = resolve_env_vars(&value).context("Failed to resolve env vars in config")?;

    let config: GroqChatConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    let config = apply_all_defaults(config);

    let report = validate(&config);
    if !report.is_valid() {
        let messages: Vec<_> = report.errors.iter().map(ToString::to_string).collect();
        bail!("Invalid config {}:\n  {}", path.display(), messages.join("\n  "));
    }

    Ok((config, report.warnings))
}
