//! Log Redaction
//!
//! Scrubs API keys and bearer tokens from strings before they are logged or
//! shown to the user.

use regex::Regex;
use std::sync::LazyLock;

static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(gsk_[a-zA-Z0-9]{20,})|(sk-[a-zA-Z0-9]{32,})|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)")
        .expect("valid api key regex")
});

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    API_KEY_RE.replace_all(input, "[REDACTED_TOKEN]").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_groq_key() {
        let raw = "Invalid API Key provided: gsk_abcdefghijklmnopqrstuvwxyz0123";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("gsk_abcdefghijklmnopqrstuvwxyz0123"));
        assert!(clean.contains("[REDACTED_TOKEN]"));
    }

    #[test]
    fn redacts_bearer_token() {
        let raw = "header was Bearer eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9";
        assert!(!redact_sensitive_data(raw).contains("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9"));
    }

    #[test]
    fn leaves_plain_text_alone() {
        assert_eq!(redact_sensitive_data("error sending request"), "error sending request");
    }
}
