#[cfg(test)]
#[path = "http_test.rs"]
mod tests;

use crate::api::{Api, ApiError, ArcApi};
use crate::config::constants::{API_PREFIX, DEFAULT_ENDPOINT};
use crate::config::user_agent;
use crate::models::{
    ChatReply, ChatRequest, Conversation, ConversationId, Health, Message, Model,
    NewConversation, Page,
};
use async_trait::async_trait;
use eyre::{Context, Result};
use reqwest::{Method, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time;

pub struct HttpApi {
    endpoint: String,
    api_prefix: String,
    timeout: Option<time::Duration>,
    client: reqwest::Client,
}

#[async_trait]
impl Api for HttpApi {
    async fn health(&self) -> Result<Health> {
        let req = self.request(Method::GET, self.root_url("/health"));
        self.fetch(req, "checking api health").await
    }

    async fn chat_health(&self) -> Result<Health> {
        let req = self.request(Method::GET, self.url("/chat/health"));
        self.fetch(req, "checking model runtime health").await
    }

    async fn list_models(&self) -> Result<Vec<Model>> {
        let req = self.request(Method::GET, self.url("/chat/models"));
        let res: ModelListResponse = self.fetch(req, "listing models").await?;
        Ok(res.models)
    }

    async fn list_conversations(&self, page: Page) -> Result<Vec<Conversation>> {
        let req = self
            .request(Method::GET, self.url("/chat/conversations"))
            .query(&[("skip", page.skip), ("limit", page.limit)]);
        let res: ConversationListResponse = self.fetch(req, "listing conversations").await?;
        Ok(res.conversations)
    }

    async fn create_conversation(&self, request: NewConversation) -> Result<Conversation> {
        let req = self
            .request(Method::POST, self.url("/chat/conversations"))
            .json(&request);
        self.fetch(req, "creating conversation").await
    }

    async fn delete_conversation(&self, id: ConversationId) -> Result<()> {
        let req = self.request(
            Method::DELETE,
            self.url(&format!("/chat/conversations/{}", id)),
        );
        self.execute(req, "deleting conversation").await
    }

    async fn list_messages(&self, id: ConversationId) -> Result<Vec<Message>> {
        let req = self.request(
            Method::GET,
            self.url(&format!("/chat/conversations/{}/messages", id)),
        );
        let res: MessageListResponse = self.fetch(req, "listing messages").await?;
        Ok(res.messages)
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatReply> {
        let request = request.with_stream(false);
        log::trace!("Sending chat request: {:?}", request);
        let req = self
            .request(Method::POST, self.url("/chat/chat"))
            .json(&request);
        self.fetch(req, "sending chat request").await
    }
}

impl From<HttpApi> for ArcApi {
    fn from(value: HttpApi) -> Self {
        Arc::new(value)
    }
}

impl HttpApi {
    pub fn init(&mut self) -> Result<()> {
        reqwest::Url::parse(&self.endpoint)
            .wrap_err(format!("parsing endpoint {}", self.endpoint))?;
        self.client = reqwest::Client::builder()
            .user_agent(user_agent())
            .build()
            .wrap_err("building http client")?;
        Ok(())
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_prefix(mut self, prefix: &str) -> Self {
        let prefix = prefix.trim_end_matches('/');
        self.api_prefix = if prefix.is_empty() || prefix.starts_with('/') {
            prefix.to_string()
        } else {
            format!("/{}", prefix)
        };
        self
    }

    pub fn with_timeout(mut self, timeout: time::Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Option<time::Duration> {
        self.timeout
    }

    /// URL of a route under the API prefix
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.endpoint, self.api_prefix, path)
    }

    fn root_url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    pub(crate) fn request(&self, method: Method, url: String) -> RequestBuilder {
        let mut req = self
            .client
            .request(method, url)
            .header("User-Agent", user_agent());

        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }
        req
    }

    /// Same as `request` but without the total timeout. Used for streamed
    /// replies.
    pub(crate) fn stream_request(&self, method: Method, url: String) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("User-Agent", user_agent())
    }

    /// Send the request and decode a JSON body
    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        action: &str,
    ) -> Result<T> {
        let res = req.send().await.wrap_err(action.to_string())?;
        let res = check_status(res).await?;
        res.json::<T>()
            .await
            .wrap_err(format!("parsing response of {}", action))
    }

    /// Send the request and discard the body
    pub(crate) async fn execute(&self, req: RequestBuilder, action: &str) -> Result<()> {
        let res = req.send().await.wrap_err(action.to_string())?;
        check_status(res).await?;
        Ok(())
    }
}

impl Default for HttpApi {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_prefix: API_PREFIX.to_string(),
            timeout: None,
            client: reqwest::Client::new(),
        }
    }
}

/// Turn a non-success response into an [`ApiError`] carrying the backend's
/// detail message.
pub(crate) async fn check_status(res: Response) -> Result<Response> {
    if res.status().is_success() {
        return Ok(res);
    }

    let http_code = res.status().as_u16();
    let body = match res.text().await {
        Ok(body) => body,
        Err(err) => {
            log::warn!("Failed to read error body: {}", err);
            String::new()
        }
    };
    log::error!("Error response ({}): {}", http_code, body);
    Err(ApiError::from_body(http_code, &body).into())
}

#[derive(Default, Debug, Deserialize)]
struct ModelListResponse {
    #[serde(default)]
    models: Vec<Model>,
}

#[derive(Default, Debug, Deserialize)]
struct ConversationListResponse {
    #[serde(default)]
    conversations: Vec<Conversation>,
}

#[derive(Default, Debug, Deserialize)]
struct MessageListResponse {
    #[serde(default)]
    messages: Vec<Message>,
}
