pub mod error;
pub mod history;
pub mod traits;
pub mod turn;
pub mod types;

pub use error::ChatError;
pub use history::History;
pub use traits::{ChatMessage, LlmProvider, LlmRequest, LlmResponse};
pub use turn::{Role, Turn};
pub use types::{ChatSettings, ModelChoice, SettingsError};
