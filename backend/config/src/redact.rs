//! Config redaction: produce safe-to-log config snapshots by masking secrets.

use serde_json::Value;

use crate::schema::SoilcastConfig;

/// Keys whose string values are secrets.
static SENSITIVE_KEYS: &[&str] = &["apiKey", "api_key", "token", "secret", "password"];

/// Serialize the config with every secret replaced by a short hint.
pub fn redact(config: &SoilcastConfig) -> Value {
    let value = serde_json::to_value(config).unwrap_or(Value::Null);
    redact_value(value, "")
}

fn is_sensitive_key(key: &str) -> bool {
    SENSITIVE_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

fn redact_value(value: Value, key: &str) -> Value {
    match value {
        Value::String(s) if is_sensitive_key(key) && !s.is_empty() => {
            // Keep the first four characters as a hint for which key is loaded.
            let hint: String = s.chars().take(4).collect();
            if s.chars().count() > 8 {
                Value::String(format!("{hint}***"))
            } else {
                Value::String("***".to_string())
            }
        }
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| {
                    let redacted = redact_value(v, &k);
                    (k, redacted)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(|v| redact_value(v, key)).collect()),
        other => other,
    }
}
