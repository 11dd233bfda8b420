pub mod documents;
pub mod error;
pub mod http;
pub mod settings;

pub use error::ApiError;
pub use http::HttpApi;

#[cfg(test)]
use mockall::automock;

use crate::{
    config::ServerConfig,
    models::{
        ChatReply, ChatRequest, Conversation, ConversationId, Health, Message, Model,
        NewConversation, Page,
    },
};
use async_trait::async_trait;
use eyre::Result;
use std::sync::Arc;

/// The conversation side of the backend API. Every method is a single
/// request with no retry.
#[async_trait]
#[cfg_attr(test, automock)]
pub trait Api {
    async fn health(&self) -> Result<Health>;
    async fn chat_health(&self) -> Result<Health>;
    async fn list_models(&self) -> Result<Vec<Model>>;
    async fn list_conversations(&self, page: Page) -> Result<Vec<Conversation>>;
    async fn create_conversation(&self, request: NewConversation) -> Result<Conversation>;
    async fn delete_conversation(&self, id: ConversationId) -> Result<()>;
    async fn list_messages(&self, id: ConversationId) -> Result<Vec<Message>>;
    async fn chat(&self, request: ChatRequest) -> Result<ChatReply>;
}

pub type ArcApi = Arc<dyn Api + Send + Sync>;

pub fn new_api(config: &ServerConfig) -> Result<Arc<HttpApi>> {
    let mut api = HttpApi::default()
        .with_endpoint(&config.endpoint)
        .with_api_prefix(&config.api_prefix);
    if let Some(timeout) = config.timeout() {
        api = api.with_timeout(timeout);
    }
    api.init()?;
    Ok(Arc::new(api))
}
