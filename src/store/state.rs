use std::sync::{Mutex, MutexGuard};

use crate::models::{Conversation, ConversationId, Message, Model};

/// One outstanding send. Fragments accumulate in the buffer until the
/// stream finishes; the assistant message itself always comes from the
/// server afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamingSession {
    id: u64,
    buffer: String,
    conversation_id: Option<ConversationId>,
}

impl StreamingSession {
    pub fn new(id: u64, conversation_id: Option<ConversationId>) -> Self {
        Self {
            id,
            buffer: String::new(),
            conversation_id,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// `None` means the backend creates a conversation for this turn.
    pub fn conversation_id(&self) -> Option<ConversationId> {
        self.conversation_id
    }

    pub fn append(&mut self, fragment: &str) {
        self.buffer.push_str(fragment);
    }
}

#[derive(Debug, Clone, Default)]
pub struct StoreState {
    pub(crate) conversations: Vec<Conversation>,
    pub(crate) active: Option<Conversation>,
    pub(crate) messages: Vec<Message>,
    pub(crate) models: Vec<Model>,
    pub(crate) loading_messages: bool,
    pub(crate) session: Option<StreamingSession>,
    pub(crate) session_counter: u64,
}

impl StoreState {
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn active_conversation(&self) -> Option<&Conversation> {
        self.active.as_ref()
    }

    pub fn active_id(&self) -> Option<ConversationId> {
        self.active.as_ref().map(|c| c.id())
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn is_loading_messages(&self) -> bool {
        self.loading_messages
    }

    pub fn is_streaming(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&StreamingSession> {
        self.session.as_ref()
    }

    pub fn stream_buffer(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.buffer())
    }

    pub(crate) fn is_current(&self, session: u64) -> bool {
        self.session.as_ref().is_some_and(|s| s.id() == session)
    }

    /// Drop the session if it is still the current one.
    pub(crate) fn close_session(&mut self, session: u64) -> bool {
        if !self.is_current(session) {
            return false;
        }
        self.session = None;
        true
    }
}

pub(crate) fn lock_state(state: &Mutex<StoreState>) -> MutexGuard<'_, StoreState> {
    state.lock().unwrap_or_else(|poisoned| {
        log::warn!("Store state lock was poisoned, recovering");
        poisoned.into_inner()
    })
}
