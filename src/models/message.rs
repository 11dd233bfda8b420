#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use std::fmt::Display;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// Messages synthesised by the client and messages persisted by the server
/// never share an identifier space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageId {
    /// Milliseconds since the epoch at creation time
    Local(i64),
    Remote(i64),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Message {
    #[serde(deserialize_with = "remote_id")]
    id: MessageId,
    role: Role,
    content: String,
    created_at: NaiveDateTime,
    #[serde(default)]
    token_count: usize,
}

impl Message {
    pub fn new(id: MessageId, role: Role, content: impl Into<String>) -> Self {
        Self {
            id,
            role,
            content: content.into(),
            created_at: chrono::Utc::now().naive_utc(),
            token_count: 0,
        }
    }

    /// Build the optimistic copy of a message the user is about to send.
    pub fn new_local(content: impl Into<String>) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: MessageId::Local(now.timestamp_millis()),
            role: Role::User,
            content: content.into(),
            created_at: now.naive_utc(),
            token_count: 0,
        }
    }

    pub fn with_created_at(mut self, timestamp: NaiveDateTime) -> Self {
        self.created_at = timestamp;
        self
    }

    pub fn with_token_count(mut self, token_count: usize) -> Self {
        self.token_count = token_count;
        self
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    pub fn token_count(&self) -> usize {
        self.token_count
    }

    pub fn is_local(&self) -> bool {
        matches!(self.id, MessageId::Local(_))
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

impl MessageId {
    pub fn is_local(&self) -> bool {
        matches!(self, MessageId::Local(_))
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::System => write!(f, "system"),
        }
    }
}

impl Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageId::Local(ts) => write!(f, "local-{}", ts),
            MessageId::Remote(id) => write!(f, "{}", id),
        }
    }
}

fn remote_id<'de, D>(deserializer: D) -> Result<MessageId, D::Error>
where
    D: Deserializer<'de>,
{
    i64::deserialize(deserializer).map(MessageId::Remote)
}
