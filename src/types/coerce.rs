//! Lenient field extraction from untyped JSON
//!
//! Hosts hand us whatever the upstream normalizer produced. Wrong types,
//! nulls and blank strings degrade to `None` instead of failing.

use serde_json::Value;

/// Longest lane/action token kept
pub const TOKEN_MAX_LEN: usize = 32;

/// Look up the first present key (camelCase and snake_case spellings)
pub(crate) fn field<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let obj = value.as_object()?;
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !v.is_null())
}

/// Raw string value, numbers rendered as text
pub(crate) fn as_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Trimmed free text; blank becomes `None`
pub(crate) fn as_text(value: Option<&Value>) -> Option<String> {
    as_string(value)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Structured token: trimmed, lowercased, restricted charset, bounded length
pub(crate) fn as_token(value: Option<&Value>) -> Option<String> {
    as_string(value).and_then(|s| sanitize_token(&s))
}

pub(crate) fn sanitize_token(raw: &str) -> Option<String> {
    let token = raw.trim().to_ascii_lowercase();
    if token.is_empty() || token.len() > TOKEN_MAX_LEN {
        return None;
    }
    let ok = token
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':' | '#' | '.'));
    if ok {
        Some(token)
    } else {
        None
    }
}

pub(crate) fn as_i64(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

pub(crate) fn as_u32(value: Option<&Value>) -> Option<u32> {
    as_i64(value).map(|n| n.clamp(0, u32::MAX as i64) as u32)
}

pub(crate) fn as_bool(value: Option<&Value>) -> Option<bool> {
    match value? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

pub(crate) fn as_f64(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|f| f.is_finite())
}

/// Years outside the supported chart range are treated as absent
pub(crate) fn as_year(value: Option<&Value>) -> Option<i32> {
    as_i64(value).and_then(valid_year)
}

pub(crate) fn valid_year(year: i64) -> Option<i32> {
    if (1900..=2100).contains(&year) {
        Some(year as i32)
    } else {
        None
    }
}
