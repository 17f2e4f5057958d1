//! OpenAI-compatible chat-completions provider.
//!
//! Works against any endpoint speaking the `/chat/completions` protocol
//! (DeepSeek in our deployment). Supports JSON and SSE streaming responses.

use super::{
    ChatMessage, ChatProvider, CompletionParams, ProviderError, ProviderStream, StreamChunk,
};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
}

pub struct OpenAiChatProvider {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiChatProvider {
    pub fn new(config: OpenAiConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| ProviderError::NotConfigured(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn build_request(
        &self,
        model: &str,
        messages: &[ChatMessage],
        params: &CompletionParams,
        stream: bool,
    ) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: model.to_string(),
            messages: messages
                .iter()
                .map(|m| ApiMessage {
                    role: m.role.as_str().to_string(),
                    content: m.content.clone(),
                })
                .collect(),
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            response_format: params.json_output.then(|| ResponseFormat {
                format_type: "json_object".to_string(),
            }),
            stream,
        }
    }
}

#[async_trait]
impl ChatProvider for OpenAiChatProvider {
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
        params: &CompletionParams,
    ) -> Result<String, ProviderError> {
        let request = self.build_request(model, messages, params, false);

        tracing::debug!(
            model,
            message_count = messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited);
            }

            return Err(ProviderError::ApiError(format!(
                "Chat API error {}: {}",
                status, error_text
            )));
        }

        let api_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Failed to parse response: {}", e)))?;

        api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.map(|m| m.content))
            .ok_or_else(|| ProviderError::ApiError("Empty completion response".to_string()))
    }

    async fn complete_stream(
        &self,
        model: &str,
        messages: &[ChatMessage],
        params: &CompletionParams,
    ) -> Result<ProviderStream, ProviderError> {
        let request = self.build_request(model, messages, params, true);

        tracing::debug!(
            model,
            message_count = messages.len(),
            "Starting streaming chat completion request"
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited);
            }

            return Err(ProviderError::ApiError(format!(
                "Chat API error {}: {}",
                status, error_text
            )));
        }

        let (tx, rx) = mpsc::channel(32);

        // When the consumer drops the receiver (client disconnect), sends
        // fail and this task stops pulling from the upstream response.
        tokio::spawn(async move {
            let mut stream = response.bytes_stream();
            let mut buffer = SseBuffer::new();

            while let Some(chunk_result) = stream.next().await {
                match chunk_result {
                    Ok(chunk) => {
                        for event in buffer.push(&chunk) {
                            let Some(data) = event.strip_prefix("data: ") else {
                                continue;
                            };
                            if data.trim() == "[DONE]" {
                                let _ = tx.send(Ok(StreamChunk::Done)).await;
                                return;
                            }
                            if let Ok(chunk) =
                                serde_json::from_str::<ChatCompletionChunk>(data)
                            {
                                let text = chunk
                                    .choices
                                    .into_iter()
                                    .next()
                                    .and_then(|c| c.delta.and_then(|d| d.content));
                                if let Some(text) = text {
                                    if !text.is_empty()
                                        && tx.send(Ok(StreamChunk::Text(text))).await.is_err()
                                    {
                                        return;
                                    }
                                }
                            }
                        }
                    }
                    Err(e) => {
                        let _ = tx
                            .send(Err(ProviderError::NetworkError(e.to_string())))
                            .await;
                        return;
                    }
                }
            }

            let _ = tx.send(Ok(StreamChunk::Done)).await;
        });

        Ok(Box::pin(ReceiverStream::new(rx)) as ProviderStream)
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.config.api_key.is_empty() {
            return Err(ProviderError::NotConfigured(
                "Chat API key not configured".to_string(),
            ));
        }
        Ok(())
    }
}

/// Reassembles SSE events from raw network chunks.
///
/// Accumulates bytes and splits on the `\n\n` event delimiter before any
/// UTF-8 decoding, so a multi-byte character arriving split across two
/// chunks stays intact.
struct SseBuffer {
    buf: Vec<u8>,
}

impl SseBuffer {
    fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Feed a chunk; returns every event completed by it, without the
    /// trailing delimiter.
    fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.buf.windows(2).position(|w| w == b"\n\n") {
            let event: Vec<u8> = self.buf.drain(..pos + 2).collect();
            events.push(String::from_utf8_lossy(&event[..pos]).into_owned());
        }
        events
    }
}

// ============================================================================
// API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ApiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ApiMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: Option<Delta>,
}

#[derive(Debug, Deserialize)]
struct Delta {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sse_buffer_yields_complete_events() {
        let mut buffer = SseBuffer::new();
        let events = buffer.push(b"data: one\n\ndata: two\n\ndata: partial");
        assert_eq!(events, vec!["data: one".to_string(), "data: two".to_string()]);
        let events = buffer.push(b"\n\n");
        assert_eq!(events, vec!["data: partial".to_string()]);
    }

    #[test]
    fn sse_buffer_keeps_multibyte_text_split_across_chunks() {
        let payload = "data: {\"choices\":[{\"delta\":{\"content\":\"鸡尾酒\"}}]}\n\n".as_bytes();
        // Split one byte into the first character of 鸡尾酒
        let split = payload.iter().position(|&b| b > 0x7f).unwrap() + 1;

        let mut buffer = SseBuffer::new();
        assert!(buffer.push(&payload[..split]).is_empty());
        let events = buffer.push(&payload[split..]);

        assert_eq!(events.len(), 1);
        let chunk: ChatCompletionChunk = serde_json::from_str(
            events[0].strip_prefix("data: ").unwrap(),
        )
        .unwrap();
        let text = chunk.choices[0].delta.as_ref().unwrap().content.clone();
        assert_eq!(text.as_deref(), Some("鸡尾酒"));
    }

    #[test]
    fn sse_buffer_handles_event_spanning_many_chunks() {
        let payload = b"data: hello world\n\n";
        let mut buffer = SseBuffer::new();
        let mut events = Vec::new();
        for byte in payload {
            events.extend(buffer.push(std::slice::from_ref(byte)));
        }
        assert_eq!(events, vec!["data: hello world".to_string()]);
    }
}
