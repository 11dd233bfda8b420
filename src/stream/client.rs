#[cfg(test)]
#[path = "client_test.rs"]
mod tests;

use std::fmt::Display;

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use reqwest::Method;

use crate::api::HttpApi;
use crate::api::http::check_status;
use crate::models::ChatRequest;

use super::{ArcStreamSink, ChatStreamer, StreamSink, Utf8Decoder};

#[async_trait]
impl ChatStreamer for HttpApi {
    async fn stream_chat(&self, request: ChatRequest, sink: ArcStreamSink) {
        let request = request.with_stream(true);
        log::trace!("Sending streaming chat request: {:?}", request);

        let res = self
            .stream_request(Method::POST, self.url("/chat/chat"))
            .json(&request)
            .send()
            .await;

        let res = match res {
            Ok(res) => res,
            Err(err) => {
                log::error!("Failed to send chat request: {}", err);
                let message = format!("failed to reach the backend: {}", err);
                sink.on_error(message).await;
                return;
            }
        };

        let res = match check_status(res).await {
            Ok(res) => res,
            Err(err) => {
                let message = err.to_string();
                sink.on_error(message).await;
                return;
            }
        };

        pump(res.bytes_stream(), sink.as_ref()).await;
    }
}

/// Drain a chunked body into the sink. Each chunk that decodes to some text
/// becomes one fragment; chunk boundaries are whatever the transport
/// produced.
pub async fn pump<S, B, E, K>(stream: S, sink: &K)
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
    K: StreamSink + ?Sized,
{
    let mut stream = Box::pin(stream);
    let mut decoder = Utf8Decoder::new();
    let mut fragments = 0usize;

    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(err) => {
                let message = format!("reading response stream: {}", err);
                log::error!("{}", message);
                sink.on_error(message).await;
                return;
            }
        };

        let text = decoder.decode(chunk.as_ref());
        if text.is_empty() {
            continue;
        }
        fragments += 1;
        log::trace!("streaming fragment: {:?}", text);
        sink.on_fragment(text).await;
    }

    let tail = decoder.finish();
    if !tail.is_empty() {
        log::warn!("Response body ended inside a multi-byte character");
        sink.on_fragment(tail).await;
    }

    log::debug!("Stream completed after {} fragments", fragments);
    sink.on_complete().await;
}
