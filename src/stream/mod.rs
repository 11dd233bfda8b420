pub mod client;
pub mod decoder;

pub use client::pump;
pub use decoder::Utf8Decoder;

#[cfg(test)]
use mockall::automock;

use crate::models::ChatRequest;
use async_trait::async_trait;
use std::sync::Arc;

/// Receiver of one streamed chat turn. For every stream exactly one of
/// `on_complete` or `on_error` is called, after any number of fragments.
#[async_trait]
pub trait StreamSink {
    async fn on_fragment(&self, fragment: String);
    async fn on_complete(&self);
    async fn on_error(&self, message: String);
}

pub type ArcStreamSink = Arc<dyn StreamSink + Send + Sync>;

#[async_trait]
#[cfg_attr(test, automock)]
pub trait ChatStreamer {
    /// Run a single streamed chat turn. The outcome is reported through the
    /// sink, never through the return value.
    async fn stream_chat(&self, request: ChatRequest, sink: ArcStreamSink);
}

pub type ArcChatStreamer = Arc<dyn ChatStreamer + Send + Sync>;
