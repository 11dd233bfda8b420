use std::sync::Arc;

use tokio::sync::mpsc;

use super::{Conversation, ConversationId, Message, NoticeMessage};

/// State changes announced by the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Notice(NoticeMessage),

    ConversationsLoaded(usize),
    MessagesLoaded(ConversationId, usize),
    ModelsLoaded(usize),

    ConversationSelected(Option<ConversationId>),
    ConversationCreated(Conversation),
    ConversationDeleted(ConversationId),

    MessageAppended(Message),

    StreamStarted(u64),
    StreamFragment(String),
    StreamCompleted(u64),
    StreamFailed(u64, String),
}

#[macro_export]
macro_rules! notice_info {
    ($msg:expr) => {
        $crate::models::Event::Notice($crate::models::NoticeMessage::info($msg))
    };
}

#[macro_export]
macro_rules! notice_warning {
    ($msg:expr) => {
        $crate::models::Event::Notice($crate::models::NoticeMessage::warning($msg))
    };
}

#[macro_export]
macro_rules! notice_error {
    ($msg:expr) => {
        $crate::models::Event::Notice($crate::models::NoticeMessage::error($msg))
    };
}

#[async_trait::async_trait]
pub trait EventTx {
    async fn send(&self, event: Event) -> Result<(), mpsc::error::SendError<Event>>;
}

#[async_trait::async_trait]
impl EventTx for mpsc::UnboundedSender<Event> {
    async fn send(&self, event: Event) -> Result<(), mpsc::error::SendError<Event>> {
        self.send(event)
    }
}

pub type ArcEventTx = Arc<dyn EventTx + Send + Sync>;
