#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;

use eyre::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::config::ChatConfig;
use crate::config::constants::{DEFAULT_TEMPERATURE, DEFAULT_TOP_P};

use super::ConversationId;

/// Generation parameters attached to every chat turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatParameters {
    pub model: Option<String>,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: Option<u32>,
    pub system_prompt: Option<String>,
}

impl ChatParameters {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = top_p;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_system_prompt(mut self, prompt: Option<String>) -> Self {
        self.system_prompt = prompt;
        self
    }

    /// Apply the same bounds the backend enforces on a chat request.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.temperature) {
            bail!("temperature must be between 0 and 2, got {}", self.temperature);
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            bail!("top_p must be between 0 and 1, got {}", self.top_p);
        }
        if self.max_tokens == Some(0) {
            bail!("max_tokens must be at least 1");
        }
        if matches!(self.model.as_deref(), Some(model) if model.trim().is_empty()) {
            bail!("model name must not be empty");
        }
        Ok(())
    }
}

impl Default for ChatParameters {
    fn default() -> Self {
        Self {
            model: None,
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            max_tokens: None,
            system_prompt: None,
        }
    }
}

impl From<&ChatConfig> for ChatParameters {
    fn from(config: &ChatConfig) -> Self {
        Self {
            model: Some(config.default_model.clone()),
            temperature: config.temperature,
            top_p: config.top_p,
            max_tokens: config.max_tokens,
            system_prompt: config.system_prompt.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<ConversationId>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub temperature: f32,
    pub top_p: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

impl ChatRequest {
    pub fn new(
        conversation_id: Option<ConversationId>,
        message: impl Into<String>,
        params: &ChatParameters,
    ) -> Self {
        Self {
            conversation_id,
            message: message.into(),
            model: params.model.clone(),
            temperature: params.temperature,
            top_p: params.top_p,
            max_tokens: params.max_tokens,
            stream: false,
            system_prompt: params.system_prompt.clone(),
        }
    }

    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }
}

/// Reply of a non-streaming chat turn
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatReply {
    pub conversation_id: ConversationId,
    pub message: String,
    pub model: String,
}
