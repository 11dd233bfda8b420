mod conversation_store;
mod session;
mod state;

pub use conversation_store::Store;
pub use state::{StoreState, StreamingSession};

use async_trait::async_trait;
use eyre::Result;
use std::sync::Arc;

use crate::models::{ArcEventTx, ChatParameters, Conversation, ConversationId, Event};

/// Result of a single `send_message` call.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// Empty input or another send in flight. Nothing changed.
    Rejected,
    Completed,
    Failed(String),
    /// The active conversation changed while the response was streaming.
    Abandoned,
}

#[async_trait]
pub trait ConversationActions {
    async fn load_conversations(&self);
    async fn load_messages(&self, conversation_id: ConversationId);
    async fn load_models(&self);
    async fn create_conversation(&self, title: &str, model: &str) -> Result<Conversation>;
    async fn select_conversation(&self, conversation: Option<Conversation>);
    async fn delete_conversation(&self, conversation_id: ConversationId) -> Result<()>;
    async fn send_message(&self, content: &str, parameters: ChatParameters) -> SendOutcome;

    fn snapshot(&self) -> StoreState;
}

pub type ArcConversationActions = Arc<dyn ConversationActions + Send + Sync>;

async fn emit(event_tx: &Option<ArcEventTx>, event: Event) {
    let Some(tx) = event_tx else {
        return;
    };
    if let Err(err) = tx.send(event).await {
        log::error!("Failed to send event: {}", err);
    }
}
