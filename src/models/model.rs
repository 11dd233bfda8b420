#[cfg(test)]
#[path = "model_test.rs"]
mod tests;

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// An entry of the backend's model registry snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    #[serde(alias = "model")]
    name: String,
    #[serde(default)]
    modified_at: Option<String>,
    #[serde(default)]
    size: u64,
    #[serde(default)]
    digest: String,
    #[serde(default)]
    details: Option<ModelDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelDetails {
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub parameter_size: Option<String>,
    #[serde(default)]
    pub quantization_level: Option<String>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modified_at: None,
            size: 0,
            digest: String::new(),
            details: None,
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub fn with_digest(mut self, digest: impl Into<String>) -> Self {
        self.digest = digest.into();
        self
    }

    pub fn with_details(mut self, details: ModelDetails) -> Self {
        self.details = Some(details);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn modified_at(&self) -> Option<&str> {
        self.modified_at.as_deref()
    }

    pub fn details(&self) -> Option<&ModelDetails> {
        self.details.as_ref()
    }

    pub fn short_digest(&self) -> &str {
        let end = self
            .digest
            .char_indices()
            .nth(12)
            .map(|(idx, _)| idx)
            .unwrap_or(self.digest.len());
        &self.digest[..end]
    }
}

/// Format a byte count the way model registries usually show it
/// (decimal units, one fractional digit).
pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }
    if unit == 0 {
        return format!("{} {}", bytes, UNITS[0]);
    }
    format!("{:.1} {}", value, UNITS[unit])
}

impl Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let details = self
            .details
            .as_ref()
            .map(|d| {
                [d.parameter_size.as_deref(), d.quantization_level.as_deref()]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();

        if details.is_empty() {
            write!(f, "{} ({})", self.name, human_size(self.size))
        } else {
            write!(f, "{} ({}, {})", self.name, details, human_size(self.size))
        }
    }
}
