use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use super::Submission;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

const MAX_NAME: usize = 200;
const MAX_EMAIL: usize = 254;
const MAX_COMPANY: usize = 200;
const MAX_MESSAGE: usize = 5000;
const MAX_INTERESTS: usize = 20;
const MAX_INTEREST: usize = 100;

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Turn a parsed body into a `Submission`, or a client-facing error message.
pub fn validate(raw: &Value) -> Result<Submission, String> {
    let obj = raw
        .as_object()
        .ok_or_else(|| "Request body must be an object".to_string())?;

    let name = optional_string(obj, "name")?;
    let email = optional_string(obj, "email")?;
    let message = optional_string(obj, "message")?;

    let missing: Vec<&str> = [("name", &name), ("email", &email), ("message", &message)]
        .into_iter()
        .filter(|(_, v)| v.is_none())
        .map(|(k, _)| k)
        .collect();
    if !missing.is_empty() {
        return Err(format!("Missing required fields: {}", missing.join(", ")));
    }

    let (Some(name), Some(email), Some(message)) = (name, email, message) else {
        return Err("Missing required fields".to_string());
    };

    if !is_valid_email(&email) {
        return Err("Invalid email address".to_string());
    }

    let company = optional_string(obj, "company")?;
    let interests = interests(obj)?;

    check_len("name", &name, MAX_NAME)?;
    check_len("email", &email, MAX_EMAIL)?;
    check_len("message", &message, MAX_MESSAGE)?;
    if let Some(company) = &company {
        check_len("company", company, MAX_COMPANY)?;
    }

    Ok(Submission {
        name,
        email,
        company,
        interests,
        message,
    })
}

/// Trimmed string value; absent, null and blank all map to `None`.
fn optional_string(obj: &Map<String, Value>, field: &str) -> Result<Option<String>, String> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
        }
        Some(_) => Err(format!("Field must be a string: {field}")),
    }
}

fn interests(obj: &Map<String, Value>) -> Result<Vec<String>, String> {
    let items: Vec<&Value> = match obj.get("interests") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(single @ Value::String(_)) => vec![single],
        Some(Value::Array(items)) => items.iter().collect(),
        Some(_) => return Err("Field must be a list of strings: interests".to_string()),
    };

    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let Value::String(s) = item else {
            return Err("Field must be a list of strings: interests".to_string());
        };
        let s = s.trim();
        if s.is_empty() {
            continue;
        }
        check_len("interests", s, MAX_INTEREST)?;
        out.push(s.to_string());
    }

    if out.len() > MAX_INTERESTS {
        return Err(format!("Too many interests (max {MAX_INTERESTS})"));
    }

    Ok(out)
}

fn check_len(field: &str, value: &str, max: usize) -> Result<(), String> {
    if value.chars().count() > max {
        return Err(format!("Field is too long: {field} (max {max} characters)"));
    }
    Ok(())
}
