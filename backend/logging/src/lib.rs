//! Structured logging for groqchat.
//!
//! Handles secret redaction, JSON file output with daily rotation, and chat
//! cycle event logging.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{ChatEvent, EventLogEntry, EventLogger, EVENT_TARGET};
pub use logger::{init_logger, level_filter, LogOptions};
pub use redact::redact_sensitive_data;
