#[cfg(test)]
#[path = "conversation_test.rs"]
mod tests;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::config::constants::NEW_CONVERSATION_TITLE;

pub type ConversationId = i64;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Conversation {
    id: ConversationId,
    title: String,
    model: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
    #[serde(default)]
    message_count: usize,
}

impl Conversation {
    pub fn new(id: ConversationId, title: impl Into<String>, model: impl Into<String>) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id,
            title: title.into(),
            model: model.into(),
            created_at: now,
            updated_at: now,
            message_count: 0,
        }
    }

    pub fn with_created_at(mut self, timestamp: NaiveDateTime) -> Self {
        self.created_at = timestamp;
        self
    }

    pub fn with_updated_at(mut self, timestamp: NaiveDateTime) -> Self {
        self.updated_at = timestamp;
        self
    }

    pub fn with_message_count(mut self, count: usize) -> Self {
        self.message_count = count;
        self
    }

    pub fn id(&self) -> ConversationId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    pub fn updated_at(&self) -> NaiveDateTime {
        self.updated_at
    }

    pub fn message_count(&self) -> usize {
        self.message_count
    }
}

/// Body of a conversation creation request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewConversation {
    pub title: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

impl NewConversation {
    pub fn new(title: impl Into<String>, model: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            title: if title.trim().is_empty() {
                NEW_CONVERSATION_TITLE.to_string()
            } else {
                title
            },
            model: model.into(),
            system_prompt: None,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: usize,
    pub limit: usize,
}

impl Page {
    pub fn new(skip: usize, limit: usize) -> Self {
        Self { skip, limit }
    }

    pub fn first(limit: usize) -> Self {
        Self { skip: 0, limit }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::first(crate::config::constants::PAGE_SIZE)
    }
}
