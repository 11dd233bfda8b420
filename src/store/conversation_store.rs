#[cfg(test)]
#[path = "conversation_store_test.rs"]
mod tests;

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use eyre::Result;

use crate::api::ArcApi;
use crate::config::constants::PAGE_SIZE;
use crate::models::{
    ArcEventTx, ChatParameters, ChatRequest, Conversation, ConversationId, Event, Message,
    NewConversation, Page,
};
use crate::notice_warning;
use crate::stream::ArcChatStreamer;

use super::session::{SessionSink, Terminal};
use super::state::{StoreState, StreamingSession, lock_state};
use super::{ConversationActions, SendOutcome, emit};

pub struct Store {
    api: ArcApi,
    streamer: ArcChatStreamer,
    state: Arc<Mutex<StoreState>>,
    event_tx: Option<ArcEventTx>,
    page_size: usize,
}

impl Store {
    pub fn new(api: ArcApi, streamer: ArcChatStreamer) -> Self {
        Self {
            api,
            streamer,
            state: Arc::new(Mutex::new(StoreState::default())),
            event_tx: None,
            page_size: PAGE_SIZE,
        }
    }

    pub fn with_event_tx(mut self, event_tx: ArcEventTx) -> Self {
        self.event_tx = Some(event_tx);
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn is_streaming(&self) -> bool {
        self.lock().is_streaming()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        lock_state(&self.state)
    }

    async fn emit(&self, event: Event) {
        emit(&self.event_tx, event).await;
    }

    /// Returns whether the session was still current.
    fn close_session(&self, session: u64) -> bool {
        self.lock().close_session(session)
    }

    async fn reconcile(&self, conversation_id: Option<ConversationId>) {
        match conversation_id {
            Some(id) => self.load_messages(id).await,
            None => self.load_conversations().await,
        }
    }
}

#[async_trait]
impl ConversationActions for Store {
    async fn load_conversations(&self) {
        log::debug!("Loading conversations");
        let conversations = match self.api.list_conversations(Page::first(self.page_size)).await {
            Ok(conversations) => conversations,
            Err(err) => {
                log::error!("Failed to load conversations: {}", err);
                self.emit(notice_warning!(format!("Failed to load conversations: {}", err)))
                    .await;
                return;
            }
        };

        let count = conversations.len();
        {
            let mut state = self.lock();
            if let Some(active_id) = state.active_id() {
                if let Some(fresh) = conversations.iter().find(|c| c.id() == active_id) {
                    state.active = Some(fresh.clone());
                }
            }
            state.conversations = conversations;
        }
        log::debug!("Loaded {} conversations", count);
        self.emit(Event::ConversationsLoaded(count)).await;
    }

    async fn load_messages(&self, conversation_id: ConversationId) {
        log::debug!("Loading messages of conversation {}", conversation_id);
        self.lock().loading_messages = true;

        let result = self.api.list_messages(conversation_id).await;

        let count = {
            let mut state = self.lock();
            state.loading_messages = false;
            match result {
                Ok(messages) => {
                    let count = messages.len();
                    state.messages = messages;
                    Ok(count)
                }
                Err(err) => Err(err),
            }
        };

        match count {
            Ok(count) => {
                log::debug!(
                    "Loaded {} messages of conversation {}",
                    count,
                    conversation_id
                );
                self.emit(Event::MessagesLoaded(conversation_id, count))
                    .await;
            }
            Err(err) => {
                log::error!(
                    "Failed to load messages of conversation {}: {}",
                    conversation_id,
                    err
                );
                self.emit(notice_warning!(format!("Failed to load messages: {}", err)))
                    .await;
            }
        }
    }

    async fn load_models(&self) {
        log::debug!("Loading models");
        let models = match self.api.list_models().await {
            Ok(models) => models,
            Err(err) => {
                log::error!("Failed to load models: {}", err);
                self.emit(notice_warning!(format!("Failed to load models: {}", err)))
                    .await;
                return;
            }
        };

        let count = models.len();
        self.lock().models = models;
        log::debug!("Loaded {} models", count);
        self.emit(Event::ModelsLoaded(count)).await;
    }

    async fn create_conversation(&self, title: &str, model: &str) -> Result<Conversation> {
        let request = NewConversation::new(title, model);
        log::debug!("Creating conversation: {:?}", request);
        let conversation = self.api.create_conversation(request).await?;

        self.lock().conversations.insert(0, conversation.clone());
        log::debug!("Created conversation {}", conversation.id());
        self.emit(Event::ConversationCreated(conversation.clone()))
            .await;
        Ok(conversation)
    }

    async fn select_conversation(&self, conversation: Option<Conversation>) {
        let selected = conversation.as_ref().map(|c| c.id());
        let abandoned = {
            let mut state = self.lock();
            let abandoned = state.session.take().map(|s| s.id());
            state.active = conversation;
            state.messages.clear();
            abandoned
        };

        if let Some(session) = abandoned {
            log::debug!("Abandoned streaming session {}", session);
        }
        log::debug!("Selected conversation {:?}", selected);
        self.emit(Event::ConversationSelected(selected)).await;

        if let Some(id) = selected {
            self.load_messages(id).await;
        }
    }

    async fn delete_conversation(&self, conversation_id: ConversationId) -> Result<()> {
        log::debug!("Deleting conversation {}", conversation_id);
        self.api.delete_conversation(conversation_id).await?;

        let was_active = {
            let mut state = self.lock();
            state.conversations.retain(|c| c.id() != conversation_id);
            let was_active = state.active_id() == Some(conversation_id);
            if was_active {
                state.active = None;
                state.messages.clear();
            }
            was_active
        };

        self.emit(Event::ConversationDeleted(conversation_id)).await;
        if was_active {
            self.emit(Event::ConversationSelected(None)).await;
        }
        Ok(())
    }

    async fn send_message(&self, content: &str, parameters: ChatParameters) -> SendOutcome {
        if content.trim().is_empty() {
            log::debug!("Ignoring empty message");
            return SendOutcome::Rejected;
        }

        let opened = {
            let mut state = self.lock();
            if state.is_streaming() {
                None
            } else {
                state.session_counter += 1;
                let session = state.session_counter;
                let conversation_id = state.active_id();
                state.session = Some(StreamingSession::new(session, conversation_id));

                let message = Message::new_local(content);
                state.messages.push(message.clone());
                Some((session, conversation_id, message))
            }
        };
        let Some((session, conversation_id, message)) = opened else {
            log::debug!("A response is still streaming, ignoring message");
            return SendOutcome::Rejected;
        };

        log::debug!(
            "Session {} started for conversation {:?}",
            session,
            conversation_id
        );
        self.emit(Event::MessageAppended(message)).await;
        self.emit(Event::StreamStarted(session)).await;

        let request = ChatRequest::new(conversation_id, content, &parameters);
        let sink = Arc::new(SessionSink::new(
            session,
            Arc::clone(&self.state),
            self.event_tx.clone(),
        ));
        self.streamer.stream_chat(request, sink.clone()).await;

        match sink.take_terminal() {
            Some(Terminal { current: false, .. }) => SendOutcome::Abandoned,
            Some(Terminal {
                result: Ok(()),
                current: true,
            }) => {
                self.reconcile(conversation_id).await;
                SendOutcome::Completed
            }
            Some(Terminal {
                result: Err(message),
                current: true,
            }) => SendOutcome::Failed(message),
            None => {
                if !self.close_session(session) {
                    return SendOutcome::Abandoned;
                }
                let message = "stream ended without a result".to_string();
                log::error!("Session {} {}", session, message);
                self.emit(Event::StreamFailed(session, message.clone()))
                    .await;
                SendOutcome::Failed(message)
            }
        }
    }

    fn snapshot(&self) -> StoreState {
        self.lock().clone()
    }
}
