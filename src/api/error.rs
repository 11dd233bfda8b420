#[cfg(test)]
#[path = "error_test.rs"]
mod tests;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// A non-success response from the backend. Displays as the backend's own
/// detail text so it can be shown to the user as is.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{detail}")]
pub struct ApiError {
    pub http_code: u16,
    pub detail: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    detail: Value,
}

impl ApiError {
    pub fn new(http_code: u16, detail: impl Into<String>) -> Self {
        Self {
            http_code,
            detail: detail.into(),
        }
    }

    /// Build the error from a raw response body, falling back to a generic
    /// message when the body carries no usable detail.
    pub fn from_body(http_code: u16, body: &str) -> Self {
        let detail = detail_message(body).unwrap_or_else(|| generic_message(http_code));
        Self::new(http_code, detail)
    }
}

/// Extract the human readable `detail` of an error body. Validation errors
/// carry a list of `{msg}` objects instead of a string.
pub fn detail_message(body: &str) -> Option<String> {
    let resp = serde_json::from_str::<ErrorResponse>(body).ok()?;
    let detail = match resp.detail {
        Value::String(text) => text,
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(text) => Some(text.clone()),
                Value::Object(obj) => obj.get("msg").and_then(Value::as_str).map(str::to_string),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("; "),
        Value::Null => return None,
        other => other.to_string(),
    };

    if detail.trim().is_empty() {
        return None;
    }
    Some(detail)
}

pub fn generic_message(http_code: u16) -> String {
    format!("request failed with status {}", http_code)
}
