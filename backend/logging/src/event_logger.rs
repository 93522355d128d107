//! Chat Event Logger
//!
//! One structured record per request cycle, written through `tracing` so it
//! lands in the NDJSON log file.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::redact::redact_sensitive_data;

/// Tracing target for chat events; enabled at `info` whatever the base level.
pub const EVENT_TARGET: &str = "chat_events";

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    SessionStarted {
        model: String,
    },
    Committed {
        model: String,
        input_chars: usize,
        reply_chars: usize,
        history_len: usize,
    },
    RolledBack {
        model: String,
        error_msg: String,
        history_len: usize,
    },
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub session_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event: ChatEvent,
}

impl EventLogEntry {
    /// Build an entry with any secrets scrubbed from the event.
    pub fn new(session_id: Uuid, mut event: ChatEvent) -> Self {
        if let ChatEvent::RolledBack { error_msg, .. } = &mut event {
            *error_msg = redact_sensitive_data(error_msg);
        }
        Self {
            session_id,
            timestamp: Utc::now(),
            event,
        }
    }
}

pub struct EventLogger;

impl EventLogger {
    pub fn log_event(session_id: Uuid, event: ChatEvent) {
        let entry = EventLogEntry::new(session_id, event);
        let json = serde_json::to_string(&entry).unwrap_or_default();
        info!(target: EVENT_TARGET, session = %entry.session_id, event = %json, "Chat event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rollback_error_is_redacted() {
        let entry = EventLogEntry::new(
            Uuid::new_v4(),
            ChatEvent::RolledBack {
                model: "mixtral-8x7b-32768".into(),
                error_msg: "bad key gsk_abcdefghijklmnopqrstuvwxyz0123".into(),
                history_len: 0,
            },
        );
        match entry.event {
            ChatEvent::RolledBack { error_msg, .. } => {
                assert!(error_msg.contains("[REDACTED_TOKEN]"));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn serializes_with_type_tag() {
        let entry = EventLogEntry::new(
            Uuid::nil(),
            ChatEvent::SessionStarted {
                model: "llama2-70b-4096".into(),
            },
        );
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["event"]["type"], "session_started");
        assert_eq!(json["session_id"], "00000000-0000-0000-0000-000000000000");
    }
}
