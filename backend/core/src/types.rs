use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Allowed values for both the memory length and the context window.
pub const WINDOW_RANGE: RangeInclusive<usize> = 1..=10;

/// Default number of turns displayed and forwarded as context.
pub const DEFAULT_WINDOW: usize = 5;

/// The fixed set of Groq models a user may select.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ModelChoice {
    #[default]
    #[serde(rename = "mixtral-8x7b-32768")]
    Mixtral8x7b,
    #[serde(rename = "llama2-70b-4096")]
    Llama2_70b,
    #[serde(rename = "llama-3.1-8b-instant")]
    Llama31_8bInstant,
    #[serde(rename = "llama-3.3-70b-versatile")]
    Llama33_70bVersatile,
}

impl ModelChoice {
    pub const ALL: [ModelChoice; 4] = [
        ModelChoice::Mixtral8x7b,
        ModelChoice::Llama2_70b,
        ModelChoice::Llama31_8bInstant,
        ModelChoice::Llama33_70bVersatile,
    ];

    /// Provider-native model identifier.
    pub fn id(&self) -> &'static str {
        match self {
            ModelChoice::Mixtral8x7b => "mixtral-8x7b-32768",
            ModelChoice::Llama2_70b => "llama2-70b-4096",
            ModelChoice::Llama31_8bInstant => "llama-3.1-8b-instant",
            ModelChoice::Llama33_70bVersatile => "llama-3.3-70b-versatile",
        }
    }

    /// Context length advertised for the model, in tokens.
    pub fn context_tokens(&self) -> u32 {
        match self {
            ModelChoice::Mixtral8x7b => 32_768,
            ModelChoice::Llama2_70b => 4_096,
            ModelChoice::Llama31_8bInstant | ModelChoice::Llama33_70bVersatile => 131_072,
        }
    }
}

impl fmt::Display for ModelChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ModelChoice {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ModelChoice::ALL
            .into_iter()
            .find(|m| m.id() == s)
            .ok_or_else(|| SettingsError::UnknownModel(s.to_string()))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("unknown model '{0}'")]
    UnknownModel(String),

    #[error("{name} must be between {min} and {max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },
}

/// User-adjustable chat parameters.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatSettings {
    model: ModelChoice,
    memory_length: usize,
    context_window: usize,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            model: ModelChoice::default(),
            memory_length: DEFAULT_WINDOW,
            context_window: DEFAULT_WINDOW,
        }
    }
}

impl ChatSettings {
    pub fn new(
        model: ModelChoice,
        memory_length: usize,
        context_window: usize,
    ) -> Result<Self, SettingsError> {
        let mut settings = Self {
            model,
            ..Default::default()
        };
        settings.set_memory_length(memory_length)?;
        settings.set_context_window(context_window)?;
        Ok(settings)
    }

    pub fn model(&self) -> ModelChoice {
        self.model
    }

    pub fn set_model(&mut self, model: ModelChoice) {
        self.model = model;
    }

    /// Number of recent turns shown to the user.
    pub fn memory_length(&self) -> usize {
        self.memory_length
    }

    pub fn set_memory_length(&mut self, n: usize) -> Result<(), SettingsError> {
        self.memory_length = check_window("memory length", n)?;
        Ok(())
    }

    /// Number of prior turns forwarded to the model.
    pub fn context_window(&self) -> usize {
        self.context_window
    }

    pub fn set_context_window(&mut self, n: usize) -> Result<(), SettingsError> {
        self.context_window = check_window("context window", n)?;
        Ok(())
    }
}

fn check_window(name: &'static str, value: usize) -> Result<usize, SettingsError> {
    if WINDOW_RANGE.contains(&value) {
        Ok(value)
    } else {
        Err(SettingsError::OutOfRange {
            name,
            value,
            min: *WINDOW_RANGE.start(),
            max: *WINDOW_RANGE.end(),
        })
    }
}
