//! Log Redaction Layer
//!
//! Scrubs API keys and bearer tokens from strings prior to logging. Upstream
//! HTTP errors can echo request URLs or headers, so their text goes through
//! here before it is logged or returned to a client.

use regex::Regex;
use std::sync::LazyLock;

static QUERY_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([?&](?:key|api_key|access_token)=)[^&\s]+").unwrap());
static BEARER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Bearer\s+[a-zA-Z0-9\-\._~+/]+=*").unwrap());
static API_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(sk-[a-zA-Z0-9_\-]{16,})|(AIza[0-9A-Za-z_\-]{30,})").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = QUERY_KEY_RE.replace_all(input, "${1}[REDACTED]");
    let redacted = BEARER_RE.replace_all(&redacted, "Bearer [REDACTED_TOKEN]");
    API_KEY_RE.replace_all(&redacted, "[REDACTED_KEY]").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_query_key() {
        let raw = "error sending request for url (https://generativelanguage.googleapis.com/v1beta/models/x:generateContent?key=abc123&alt=json)";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("abc123"));
        assert!(clean.contains("?key=[REDACTED]&alt=json"));
    }

    #[test]
    fn redacts_bearer_and_raw_keys() {
        let raw = "Bearer eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9 with sk-proj-abcdefghijklmnop1234 and AIzaSyA1234567890abcdefghijklmnopqrstu";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("eyJhbGci"));
        assert!(!clean.contains("sk-proj"));
        assert!(!clean.contains("AIzaSy"));
    }

    #[test]
    fn leaves_plain_text_alone() {
        assert_eq!(redact_sensitive_data("HTTP 503: overloaded"), "HTTP 503: overloaded");
    }
}
