use serde_json::Value;

/// Check if the honeypot field is filled. Returns true if spam detected.
pub fn is_spam(data: &Value, honeypot_field: &str) -> bool {
    if honeypot_field.is_empty() {
        return false;
    }

    data.get(honeypot_field).is_some_and(is_filled)
}

fn is_filled(value: &Value) -> bool {
    match value {
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => items.iter().any(is_filled),
        Value::Null | Value::Bool(false) => false,
        _ => true,
    }
}
