//! Query-string parsing helpers for list endpoints.
//!
//! Values arrive as raw strings so that a malformed number becomes a field
//! validation message rather than an extractor rejection.

use greenlight_core::validator::Validator;

/// Return `value`, or `default` when it is absent or empty.
pub fn read_string(value: Option<&str>, default: &str) -> String {
    match value {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => default.to_string(),
    }
}

/// Split a comma-separated value, or return `default` when absent or empty.
pub fn read_csv(value: Option<&str>, default: Vec<String>) -> Vec<String> {
    match value {
        Some(s) if !s.is_empty() => s.split(',').map(str::to_string).collect(),
        _ => default,
    }
}

/// Parse an integer parameter.
///
/// Absent or empty values yield `default`. An unparsable value records
/// "must be an integer value" under `key` and also yields `default`.
pub fn read_int(value: Option<&str>, key: &str, default: i64, v: &mut Validator) -> i64 {
    match value {
        Some(s) if !s.is_empty() => s.parse().unwrap_or_else(|_| {
            v.add_error(key, "must be an integer value");
            default
        }),
        _ => default,
    }
}
