use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Merged view of the backend defaults and the stored overrides
pub type SettingsMap = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Setting {
    pub key: String,
    pub value: Value,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingUpdate {
    pub key: String,
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SettingUpdate {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
            description: None,
        }
    }

    /// Values that are not valid JSON are stored as plain strings.
    pub fn parse(key: impl Into<String>, raw: &str) -> Self {
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        Self::new(key, value)
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
}
